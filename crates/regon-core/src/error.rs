// ── Core error types ──
//
// Errors surfaced by the lookup facade. Payload-level failures from
// `regon-api` are translated into their own variants; anything else from the
// transport is wrapped with its source intact.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Caller errors ────────────────────────────────────────────────
    #[error("At least one parameter (nip, regon, krs) is required")]
    MissingSearchCriterion,

    #[error("Not a search result record, missing: {}", .missing.join(", "))]
    InvalidSummaryRecord { missing: Vec<&'static str> },

    #[error("Not a full report record, expected one of: {}", .missing.join(", "))]
    InvalidReportRecord { missing: Vec<&'static str> },

    #[error("No report definition for entity type {typ:?} (silos_id {silos_id:?})")]
    UnknownReportShape {
        typ: String,
        silos_id: Option<String>,
    },

    #[error("Invalid value {value:?} for field {field}")]
    InvalidFieldValue { field: String, value: String },

    // ── Registry responses ───────────────────────────────────────────
    #[error("Empty response, probably an authorization problem")]
    EmptyResponse,

    #[error("Unexpected response: {body}")]
    UnexpectedResponse { body: String },

    #[error("{message}")]
    RegonApi {
        message: String,
        /// Numeric registry error code, when it parsed as one.
        code: Option<i64>,
    },

    // ── Transport (wrapped, not translated) ──────────────────────────
    #[error(transparent)]
    Transport(regon_api::Error),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the registry found nothing for the criteria.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RegonApi {
                code: Some(regon_api::error::NOT_FOUND_CODE),
                ..
            }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<regon_api::Error> for CoreError {
    fn from(err: regon_api::Error) -> Self {
        match err {
            regon_api::Error::EmptyResponse => CoreError::EmptyResponse,
            regon_api::Error::UnexpectedResponse { body } => CoreError::UnexpectedResponse { body },
            regon_api::Error::Api { message, code } => CoreError::RegonApi { message, code },
            other => CoreError::Transport(other),
        }
    }
}

impl From<figment::Error> for CoreError {
    fn from(err: figment::Error) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}
