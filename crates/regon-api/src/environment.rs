use secrecy::SecretString;

/// Public key accepted by the sandbox service. Published in the
/// registry's developer documentation; not a secret.
pub const SANDBOX_API_KEY: &str = "abcde12345abcde12345";

/// Which registry deployment to talk to.
///
/// Production requires a personal key issued by GUS; the sandbox accepts
/// [`SANDBOX_API_KEY`] and serves a frozen, partial copy of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    /// Pick the environment from the presence of a caller-supplied key.
    pub fn for_key(api_key: Option<&SecretString>) -> Self {
        if api_key.is_some() {
            Self::Production
        } else {
            Self::Sandbox
        }
    }

    /// Service endpoint (the `.svc` address SOAP requests are posted to).
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Production => "https://wyszukiwarkaregon.stat.gov.pl/wsBIR/UslugaBIRzewnPubl.svc",
            Self::Sandbox => {
                "https://wyszukiwarkaregontest.stat.gov.pl/wsBIR/UslugaBIRzewnPubl.svc"
            }
        }
    }
}
