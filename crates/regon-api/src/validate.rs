// Payload validation
//
// The registry answers HTTP 200 for successes and domain errors alike, so
// every outcome is decided from the shape of the returned document.

use tracing::trace;

use crate::error::Error;
use crate::xml::{self, Element};

/// Result container every well-formed payload carries.
pub const DATA_TAG: &str = "dane";

/// Classify a raw result payload.
///
/// Returns the parsed document root when the payload is usable. Exactly one
/// outcome holds for any input:
/// - empty payload: [`Error::EmptyResponse`]
/// - not well-formed, or no `dane` under the root: [`Error::UnexpectedResponse`]
/// - `dane` carrying an `ErrorCode`: [`Error::Api`]
/// - otherwise: `Ok(root)`
pub fn validate(raw: &str) -> Result<Element, Error> {
    if raw.is_empty() {
        return Err(Error::EmptyResponse);
    }

    let unexpected = || Error::UnexpectedResponse {
        body: raw.to_owned(),
    };
    let root = xml::parse(raw).map_err(|_| unexpected())?;
    let data = root.child(DATA_TAG).ok_or_else(unexpected)?;

    if let Some(code) = data.child("ErrorCode") {
        let message = data
            .child("ErrorMessageEn")
            .or_else(|| data.child("ErrorMessagePl"))
            .and_then(Element::text)
            .unwrap_or_default();
        trace!(code = ?code.text(), error_message = message, "registry returned an error envelope");
        return Err(Error::api(message, code.text()));
    }

    Ok(root)
}
