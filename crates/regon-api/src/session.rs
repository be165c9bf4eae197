// Lazily authenticated session over the BIR service
//
// The first invocation performs the `Zaloguj` exchange and caches the
// returned session id; every request after that carries it in the `sid`
// HTTP header. The id is never refreshed: a session the service stops
// accepting shows up as empty payloads, which the validator reports.

use reqwest::header::CONTENT_TYPE;
use secrecy::SecretString;
use tokio::sync::OnceCell;
use tracing::{debug, trace, warn};
use url::Url;

use crate::environment::{Environment, SANDBOX_API_KEY};
use crate::error::Error;
use crate::soap::{self, Request};
use crate::transport::TransportConfig;

/// Header the service reads the session id from.
pub const SESSION_HEADER: &str = "sid";

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub environment: Environment,
    pub api_key: SecretString,
    pub endpoint: Url,
    pub transport: TransportConfig,
}

impl SessionConfig {
    /// Production when a key is supplied, sandbox (with the public test
    /// key) otherwise.
    pub fn new(api_key: Option<SecretString>) -> Result<Self, Error> {
        let environment = Environment::for_key(api_key.as_ref());
        let endpoint = Url::parse(environment.endpoint())?;
        let api_key = api_key.unwrap_or_else(|| SecretString::from(SANDBOX_API_KEY.to_owned()));
        Ok(Self {
            environment,
            api_key,
            endpoint,
            transport: TransportConfig::default(),
        })
    }

    /// Post to a different address (proxy, mock server) than the
    /// environment's default endpoint.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

/// Session-scoped client for the BIR service.
///
/// Safe to share between tasks: concurrent first calls wait on a single
/// login instead of each authenticating.
pub struct Session {
    http: reqwest::Client,
    endpoint: Url,
    environment: Environment,
    api_key: SecretString,
    sid: OnceCell<String>,
}

impl Session {
    /// Create an unbound session. No network traffic happens until the
    /// first [`invoke`](Self::invoke).
    pub fn new(config: SessionConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Ok(Self {
            http,
            endpoint: config.endpoint,
            environment: config.environment,
            api_key: config.api_key,
            sid: OnceCell::new(),
        })
    }

    /// Create a session with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: SessionConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint,
            environment: config.environment,
            api_key: config.api_key,
            sid: OnceCell::new(),
        }
    }

    /// Whether the login exchange has completed.
    pub fn is_bound(&self) -> bool {
        self.sid.initialized()
    }

    /// Run `request`, authenticating first if this is the first call.
    ///
    /// Returns the raw text of the operation's result element. Transport
    /// errors and SOAP faults propagate as-is; nothing is retried.
    pub async fn invoke(&self, request: &Request<'_>) -> Result<String, Error> {
        let sid = self.sid.get_or_try_init(|| self.login()).await?;
        self.call(request, Some(sid)).await
    }

    async fn login(&self) -> Result<String, Error> {
        debug!(environment = ?self.environment, "logging in");

        let sid = self
            .call(
                &Request::Login {
                    api_key: &self.api_key,
                },
                None,
            )
            .await?;

        if sid.is_empty() {
            warn!("login returned an empty session id; the API key was probably rejected");
        } else {
            debug!("login successful");
        }
        Ok(sid)
    }

    async fn call(&self, request: &Request<'_>, sid: Option<&str>) -> Result<String, Error> {
        let operation = request.operation();
        debug!(operation, "POST {}", self.endpoint);

        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, request.content_type())
            .body(request.envelope(&self.endpoint));
        if let Some(sid) = sid {
            builder = builder.header(SESSION_HEADER, sid);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(operation, %status, bytes = body.len(), "response received");

        // Faults usually come with HTTP 500; prefer the fault's own reason.
        let result = soap::extract_result(operation, &body);
        if status.is_success() || matches!(result, Err(Error::SoapFault { .. })) {
            return result;
        }
        Err(Error::Http {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }
}
