// ── Report definition lookup ──
//
// Maps an entity's type code (and, for individuals, its silos id) to the
// name of the remote report definition. Pure tables, no I/O.

use strum::{AsRefStr, Display, EnumString};

use crate::error::CoreError;

/// Entity kind code (`typ`) as returned by the search operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
pub enum EntityKind {
    /// Natural person running a business.
    #[strum(serialize = "F")]
    Individual,
    /// Local unit of a natural person's business.
    #[strum(serialize = "LF")]
    IndividualLocalUnit,
    /// Legal person or organisational unit without legal personality.
    #[strum(serialize = "P")]
    LegalPerson,
    /// Local unit of a legal person.
    #[strum(serialize = "LP")]
    LegalPersonLocalUnit,
}

/// One known report shape: which definition serves which entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportShape {
    pub kind: EntityKind,
    /// Only individuals are split by silos id. Legal persons carry silos
    /// id 6, a technical value with no bearing on the report.
    pub silos_id: Option<&'static str>,
    pub report: &'static str,
}

/// Every full report definition the client knows how to request.
pub const FULL_REPORTS: &[ReportShape] = &[
    // CEIDG-registered activity
    ReportShape {
        kind: EntityKind::Individual,
        silos_id: Some("1"),
        report: "BIR11OsFizycznaDzialalnoscCeidg",
    },
    // agricultural activity
    ReportShape {
        kind: EntityKind::Individual,
        silos_id: Some("2"),
        report: "BIR11OsFizycznaDzialalnoscRolnicza",
    },
    // other activity (bailiffs, notaries, agritourism outside CEIDG)
    ReportShape {
        kind: EntityKind::Individual,
        silos_id: Some("3"),
        report: "BIR11OsFizycznaDzialalnoscPozostala",
    },
    // removed from REGON before 2014-11-08
    ReportShape {
        kind: EntityKind::Individual,
        silos_id: Some("4"),
        report: "BIR11OsFizycznaDzialalnoscSkreslonaDo20141108",
    },
    ReportShape {
        kind: EntityKind::IndividualLocalUnit,
        silos_id: None,
        report: "BIR11JednLokalnaOsFizycznej",
    },
    ReportShape {
        kind: EntityKind::LegalPerson,
        silos_id: None,
        report: "BIR11OsPrawna",
    },
    ReportShape {
        kind: EntityKind::LegalPersonLocalUnit,
        silos_id: None,
        report: "BIR11JednLokalnaOsPrawnej",
    },
];

/// Classification (PKD) report for natural persons.
pub const CLASSIFICATION_INDIVIDUAL: &str = "PublDaneRaportDzialalnosciFizycznej";

/// Classification (PKD) report for legal persons.
pub const CLASSIFICATION_LEGAL: &str = "PublDaneRaportDzialalnosciPrawnej";

/// Resolve the full report definition for an entity.
///
/// Fails with [`CoreError::UnknownReportShape`] for an unknown type code, or
/// for an individual whose silos id is missing or not one of `1`..`4`.
pub fn full_report_name(typ: &str, silos_id: Option<&str>) -> Result<&'static str, CoreError> {
    let unknown = || CoreError::UnknownReportShape {
        typ: typ.to_owned(),
        silos_id: silos_id.map(str::to_owned),
    };

    let kind: EntityKind = typ.parse().map_err(|_| unknown())?;
    let silos_id = match kind {
        EntityKind::Individual => Some(silos_id.ok_or_else(unknown)?),
        _ => None,
    };

    FULL_REPORTS
        .iter()
        .find(|shape| shape.kind == kind && shape.silos_id == silos_id)
        .map(|shape| shape.report)
        .ok_or_else(unknown)
}

/// Resolve the classification report definition for an entity.
///
/// Never fails: anything other than a legal person, local units and
/// unknown codes included, gets the natural-person report. Whether local
/// units of legal persons really belong there is unverified against the
/// service.
pub fn classification_report_name(typ: &str) -> &'static str {
    match typ.parse::<EntityKind>() {
        Ok(EntityKind::LegalPerson) => CLASSIFICATION_LEGAL,
        _ => CLASSIFICATION_INDIVIDUAL,
    }
}
