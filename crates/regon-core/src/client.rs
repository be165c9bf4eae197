// ── Registry lookup facade ──
//
// Composes session, validation, resolution and field mapping into the
// public lookups. Each call is one round trip; nothing is cached besides
// the session id held by the underlying `Session`.

use regon_api::validate::DATA_TAG;
use regon_api::{Request, SearchCriterion, Session, validate};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::mapper::{Cast, FieldSpec, flatten, project_into};
use crate::model::{AddressView, Classification, ContactView, EntitySummary, FullReport};
use crate::report;
use crate::views;

/// Fields kept from a search result row. The sandbox omits `ulica`.
const SUMMARY_FIELDS: [FieldSpec; 15] = [
    FieldSpec::new("data_zakonczenia_dzialalnosci"),
    FieldSpec::new("gmina"),
    FieldSpec::new("kod_pocztowy"),
    FieldSpec::new("miejscowosc"),
    FieldSpec::new("nazwa"),
    FieldSpec::new("nip"),
    FieldSpec::new("nr_lokalu"),
    FieldSpec::new("nr_nieruchomosci"),
    FieldSpec::new("powiat"),
    FieldSpec::new("regon"),
    FieldSpec::new("silos_id"),
    FieldSpec::new("status_nip"),
    FieldSpec::new("typ"),
    FieldSpec::new("ulica"),
    FieldSpec::new("wojewodztwo"),
];

const CLASSIFICATION_FIELDS: [FieldSpec; 3] = [
    FieldSpec::new("pkd_kod").renamed("kod").cast(Cast::Text),
    FieldSpec::new("pkd_nazwa").renamed("nazwa").cast(Cast::Text),
    FieldSpec::new("pkd_przewazajace")
        .renamed("przewazajace")
        .cast(Cast::Flag),
];

/// Search criteria. At least one identifier is required; when several are
/// set, `nip` wins over `regon`, which wins over `krs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub nip: Option<String>,
    pub regon: Option<String>,
    pub krs: Option<String>,
}

impl SearchQuery {
    pub fn nip(nip: impl Into<String>) -> Self {
        Self {
            nip: Some(nip.into()),
            ..Self::default()
        }
    }

    pub fn regon(regon: impl Into<String>) -> Self {
        Self {
            regon: Some(regon.into()),
            ..Self::default()
        }
    }

    pub fn krs(krs: impl Into<String>) -> Self {
        Self {
            krs: Some(krs.into()),
            ..Self::default()
        }
    }

    /// The identifier actually sent. Empty strings count as absent.
    pub fn criterion(&self) -> Result<SearchCriterion<'_>, CoreError> {
        if let Some(nip) = given(self.nip.as_deref()) {
            Ok(SearchCriterion::Nip(nip))
        } else if let Some(regon) = given(self.regon.as_deref()) {
            Ok(SearchCriterion::Regon(regon))
        } else if let Some(krs) = given(self.krs.as_deref()) {
            Ok(SearchCriterion::Krs(krs))
        } else {
            Err(CoreError::MissingSearchCriterion)
        }
    }
}

fn given(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Client for the REGON registry.
///
/// Cheap to share behind an `Arc`; the session logs in on the first lookup.
pub struct RegonClient {
    session: Session,
}

impl RegonClient {
    /// Create a client. No network traffic happens until the first lookup.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let session = Session::new(config.session_config()?)?;
        Ok(Self { session })
    }

    /// Wrap an existing session.
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Find entities by tax id, registry number, or court-register number.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<EntitySummary>, CoreError> {
        let criterion = query.criterion()?;
        debug!(by = criterion.tag(), value = criterion.value(), "searching registry");

        let raw = self.session.invoke(&Request::Search(criterion)).await?;
        let root = validate(&raw)?;

        root.children_named(DATA_TAG)
            .map(|item| project_into(&flatten(item, false), &SUMMARY_FIELDS))
            .collect()
    }

    /// Detailed report of an entity returned by [`search`](Self::search).
    ///
    /// The report definition follows from the summary's `typ` and
    /// `silos_id`; all fields come back with their report prefix removed.
    ///
    /// `silos_id` must be set for every entity kind, even though only
    /// individuals (`F`) need it to pick a report. A summary from
    /// [`search`](Self::search) always carries it; `None` counts as missing.
    pub async fn full_report(&self, summary: &EntitySummary) -> Result<FullReport, CoreError> {
        let [regon, typ, silos_id] = views::require(summary, ["regon", "typ", "silos_id"])?;
        let report_name = report::full_report_name(typ, Some(silos_id))?;
        debug!(regon, report_name, "fetching full report");

        let raw = self
            .session
            .invoke(&Request::Report { regon, report_name })
            .await?;
        let root = validate(&raw)?;
        let data = root
            .child(DATA_TAG)
            .ok_or_else(|| CoreError::UnexpectedResponse { body: raw.clone() })?;

        Ok(FullReport::new(flatten(data, true)))
    }

    /// Activity classification (PKD) entries of an entity returned by
    /// [`search`](Self::search).
    pub async fn classification_report(
        &self,
        summary: &EntitySummary,
    ) -> Result<Vec<Classification>, CoreError> {
        let [regon, typ] = views::require(summary, ["regon", "typ"])?;
        let report_name = report::classification_report_name(typ);
        debug!(regon, report_name, "fetching classification report");

        let raw = self
            .session
            .invoke(&Request::Report { regon, report_name })
            .await?;
        let root = validate(&raw)?;

        root.children_named(DATA_TAG)
            .map(|item| project_into(&flatten(item, true), &CLASSIFICATION_FIELDS))
            .collect()
    }

    /// Address of a search result. No network traffic.
    pub fn address(&self, summary: &EntitySummary) -> Result<AddressView, CoreError> {
        views::address(summary)
    }

    /// Contact details of a full report. No network traffic.
    pub fn contact(&self, report: &FullReport) -> Result<ContactView, CoreError> {
        views::contact(report)
    }
}
