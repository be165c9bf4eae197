// SOAP 1.2 framing for the BIR 1.1 service
//
// Builds request envelopes (with the WS-Addressing headers the service
// insists on) and digs the `<Operation>Result` text out of replies. Replies
// arrive MTOM-wrapped, so the envelope is located inside the raw body
// before parsing.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;
use crate::xml::{self, Element};

/// Namespace of the operations' WS-Addressing actions.
pub const ACTION_NS: &str = "http://CIS/BIR/PUBL/2014/07/IUslugaBIRzewnPubl/";

const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const WSA_NS: &str = "http://www.w3.org/2005/08/addressing";
const SERVICE_NS: &str = "http://CIS/BIR/PUBL/2014/07";
const DATA_CONTRACT_NS: &str = "http://CIS/BIR/PUBL/2014/07/DataContract";

static ENVELOPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:[\w.-]+:)?Envelope\b.*</(?:[\w.-]+:)?Envelope\s*>")
        .expect("envelope pattern is valid")
});

/// Identifier accepted by the search operation. Exactly one is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCriterion<'a> {
    Nip(&'a str),
    Regon(&'a str),
    Krs(&'a str),
}

impl SearchCriterion<'_> {
    /// Data-contract element name of the parameter.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Nip(_) => "Nip",
            Self::Regon(_) => "Regon",
            Self::Krs(_) => "Krs",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Nip(v) | Self::Regon(v) | Self::Krs(v) => v,
        }
    }
}

/// A remote operation together with its arguments.
#[derive(Debug, Clone, Copy)]
pub enum Request<'a> {
    /// `Zaloguj`: exchange the user key for a session id.
    Login { api_key: &'a SecretString },
    /// `DaneSzukajPodmioty`: look entities up by one identifier.
    Search(SearchCriterion<'a>),
    /// `DanePobierzPelnyRaport`: fetch a named report for one registry number.
    Report {
        regon: &'a str,
        report_name: &'a str,
    },
}

impl Request<'_> {
    /// Remote operation name.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Login { .. } => "Zaloguj",
            Self::Search(_) => "DaneSzukajPodmioty",
            Self::Report { .. } => "DanePobierzPelnyRaport",
        }
    }

    /// WS-Addressing action URI.
    pub fn action(&self) -> String {
        format!("{ACTION_NS}{}", self.operation())
    }

    /// Full `Content-Type` header value, carrying the action parameter.
    pub fn content_type(&self) -> String {
        format!("{}; action=\"{}\"", crate::transport::SOAP_CONTENT_TYPE, self.action())
    }

    /// Render the request envelope addressed to `endpoint`.
    pub fn envelope(&self, endpoint: &Url) -> String {
        let op = self.operation();
        let params = match self {
            Self::Login { api_key } => {
                param("ns:pKluczUzytkownika", api_key.expose_secret())
            }
            Self::Search(criterion) => format!(
                "<ns:pParametryWyszukiwania>{}</ns:pParametryWyszukiwania>",
                param(&format!("dat:{}", criterion.tag()), criterion.value())
            ),
            Self::Report { regon, report_name } => format!(
                "{}{}",
                param("ns:pRegon", regon),
                param("ns:pNazwaRaportu", report_name)
            ),
        };

        format!(
            "<soap:Envelope xmlns:soap=\"{SOAP_NS}\" xmlns:ns=\"{SERVICE_NS}\" xmlns:dat=\"{DATA_CONTRACT_NS}\">\
             <soap:Header xmlns:wsa=\"{WSA_NS}\">\
             <wsa:To>{to}</wsa:To>\
             <wsa:Action>{action}</wsa:Action>\
             </soap:Header>\
             <soap:Body><ns:{op}>{params}</ns:{op}></soap:Body>\
             </soap:Envelope>",
            to = xml::escape(endpoint.as_str()),
            action = self.action(),
        )
    }
}

fn param(tag: &str, value: &str) -> String {
    format!("<{tag}>{}</{tag}>", xml::escape(value))
}

/// Locate and parse the SOAP envelope inside a raw (possibly MTOM) body.
pub fn parse_envelope(body: &str) -> Result<Element, Error> {
    let unexpected = || Error::UnexpectedResponse {
        body: body.to_owned(),
    };
    let envelope = ENVELOPE.find(body).ok_or_else(unexpected)?;
    xml::parse(envelope.as_str()).map_err(|_| unexpected())
}

/// Extract the text of `<{operation}Result>` from a reply body.
///
/// A `Fault` becomes [`Error::SoapFault`]; an empty result element yields an
/// empty string, left for the validator to classify.
pub fn extract_result(operation: &str, body: &str) -> Result<String, Error> {
    let envelope = parse_envelope(body)?;

    if let Some(fault) = envelope.find("Fault") {
        return Err(fault_error(fault));
    }

    let result = envelope
        .find(&format!("{operation}Result"))
        .ok_or_else(|| Error::UnexpectedResponse {
            body: body.to_owned(),
        })?;
    Ok(result.text.clone().unwrap_or_default())
}

fn fault_error(fault: &Element) -> Error {
    // SOAP 1.2 uses Code/Value + Reason/Text; 1.1 faultcode + faultstring.
    let code = fault
        .find("Value")
        .or_else(|| fault.find("faultcode"))
        .and_then(Element::text)
        .unwrap_or("unknown");
    let reason = fault
        .find("Text")
        .or_else(|| fault.find("faultstring"))
        .and_then(Element::text)
        .unwrap_or_default();
    Error::SoapFault {
        code: code.trim().to_owned(),
        reason: reason.trim().to_owned(),
    }
}
