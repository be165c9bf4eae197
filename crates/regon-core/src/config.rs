// ── Client configuration ──
//
// Describes *how* to reach the registry. Built in code or extracted from a
// figment the host application assembles; this crate never reads files or
// the environment on its own.

use std::path::PathBuf;
use std::time::Duration;

use figment::Figment;
use regon_api::{SessionConfig, TlsMode, TransportConfig};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::error::CoreError;

/// Configuration for a [`RegonClient`](crate::RegonClient).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Production API key. Absent means the sandbox with its public key.
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,

    /// Override the environment's endpoint (proxies, test servers).
    pub endpoint: Option<Url>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Extra root certificate (PEM) to trust.
    pub ca_cert: Option<PathBuf>,

    /// Override the `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            timeout_secs: default_timeout(),
            ca_cert: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn deserialize_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl ClientConfig {
    /// Sandbox configuration (public test key, test endpoint).
    pub fn sandbox() -> Self {
        Self::default()
    }

    /// Production configuration with the given key.
    pub fn production(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Per-request timeout, rounded up to whole seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self
    }

    /// Extract a configuration from a caller-assembled figment.
    ///
    /// Keys match the field names; anything missing keeps its default.
    pub fn from_figment(figment: &Figment) -> Result<Self, CoreError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.timeout_secs == 0 {
            return Err(CoreError::Config {
                message: "timeout_secs must be greater than zero".into(),
            });
        }
        if let Some(ref endpoint) = self.endpoint {
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(CoreError::Config {
                    message: format!("endpoint must be http(s), got {endpoint}"),
                });
            }
        }
        Ok(())
    }

    /// Translate into the transport-level session configuration.
    pub fn session_config(&self) -> Result<SessionConfig, CoreError> {
        self.validate()?;

        let mut transport = TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..TransportConfig::default()
        };
        if let Some(ref path) = self.ca_cert {
            transport.tls = TlsMode::CustomCa(path.clone());
        }
        if let Some(ref agent) = self.user_agent {
            transport.user_agent.clone_from(agent);
        }

        let mut session = SessionConfig::new(self.api_key.clone())?.with_transport(transport);
        if let Some(ref endpoint) = self.endpoint {
            session = session.with_endpoint(endpoint.clone());
        }
        Ok(session)
    }
}
