// ── Derived views ──
//
// Pure projections over records the facade already returned. Inputs are
// checked for the fields the view needs up front; a missing one is reported
// by name instead of producing a half-filled view.

use crate::error::CoreError;
use crate::model::{AddressView, ContactView, EntitySummary, FullReport};

/// Keys whose presence marks a map as a full report.
const REPORT_IDENTIFIERS: [&str; 2] = ["regon9", "regon14"];

/// Look up `required` fields of `summary`, in order.
///
/// Fails with [`CoreError::InvalidSummaryRecord`] listing every required
/// field the summary lacks.
pub(crate) fn require<'a, const N: usize>(
    summary: &'a EntitySummary,
    required: [&'static str; N],
) -> Result<[&'a str; N], CoreError> {
    let values = required.map(|field| summary.get(field));
    let missing: Vec<&'static str> = required
        .iter()
        .zip(&values)
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::InvalidSummaryRecord { missing });
    }
    Ok(values.map(Option::unwrap_or_default))
}

/// Address of a search result, with a composed street line.
pub fn address(summary: &EntitySummary) -> Result<AddressView, CoreError> {
    require(summary, ["miejscowosc"])?;

    let mut adres = [summary.ulica.as_deref(), summary.nr_nieruchomosci.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(unit) = summary.nr_lokalu.as_deref().filter(|u| !u.is_empty()) {
        adres.push('/');
        adres.push_str(unit);
    }

    Ok(AddressView {
        ulica: summary.ulica.clone(),
        nr_nieruchomosci: summary.nr_nieruchomosci.clone(),
        nr_lokalu: summary.nr_lokalu.clone(),
        adres: (!adres.is_empty()).then_some(adres),
        kod_pocztowy: summary.kod_pocztowy.clone(),
        miejscowosc: summary.miejscowosc.clone(),
        gmina: summary.gmina.clone(),
        powiat: summary.powiat.clone(),
        wojewodztwo: summary.wojewodztwo.clone(),
    })
}

/// Contact details of a full report. Fields the report shape does not
/// carry come back as `None`.
pub fn contact(report: &FullReport) -> Result<ContactView, CoreError> {
    if !REPORT_IDENTIFIERS.iter().any(|key| report.contains(key)) {
        return Err(CoreError::InvalidReportRecord {
            missing: REPORT_IDENTIFIERS.to_vec(),
        });
    }

    let field = |name: &str| report.get(name).map(str::to_owned);
    Ok(ContactView {
        nr_telefonu: field("numer_telefonu"),
        nr_wewnetrzny_telefonu: field("numer_wewnetrzny_telefonu"),
        nr_faksu: field("numer_faksu"),
        email: field("adres_email"),
        www: field("adres_stronyinternetowej"),
    })
}
