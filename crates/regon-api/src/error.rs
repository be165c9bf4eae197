use thiserror::Error;

/// Error code the registry uses for "no data found for the search criteria".
pub const NOT_FOUND_CODE: i64 = 4;

/// Top-level error type for the `regon-api` crate.
///
/// Covers transport, SOAP framing, and the payload-level failures the
/// registry reports with HTTP 200. `regon-core` maps these into its own
/// domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status without a SOAP fault in the body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── SOAP ────────────────────────────────────────────────────────
    /// The service answered with a SOAP `Fault` envelope.
    #[error("SOAP fault ({code}): {reason}")]
    SoapFault { code: String, reason: String },

    // ── Payload ─────────────────────────────────────────────────────
    /// The service returned no payload. Usually a rejected or missing
    /// session id: the registry never reports that explicitly.
    #[error("Empty response, probably an authorization problem")]
    EmptyResponse,

    /// Payload is not well-formed XML or lacks the expected structure.
    #[error("Unexpected response: {body}")]
    UnexpectedResponse { body: String },

    /// Error envelope reported by the registry (`ErrorCode` / `ErrorMessageEn`).
    #[error("{message}")]
    Api { message: String, code: Option<i64> },
}

impl Error {
    /// Build an [`Error::Api`] from the raw envelope fields.
    ///
    /// The code is parsed best-effort; anything that is not an integer
    /// becomes `None` rather than a failure.
    pub fn api(message: impl Into<String>, code: Option<&str>) -> Self {
        Self::Api {
            message: message.into(),
            code: code.and_then(|c| c.trim().parse().ok()),
        }
    }

    /// Returns `true` if the registry reported that nothing matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { code: Some(NOT_FOUND_CODE), .. })
    }

    /// Returns `true` if this most likely means the session was not accepted.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::EmptyResponse => true,
            Self::Http { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Extract the registry error code, if available.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }
}
