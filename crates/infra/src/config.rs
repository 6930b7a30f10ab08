//! Client configuration

use std::env;
use std::fmt;
use std::time::Duration;

use lattice_domain::{LatticeError, Result};
use url::Url;

use crate::http::RetryPolicy;

/// Default control plane endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.lattice.io";

/// User agent sent with every request, including token exchanges.
pub const USER_AGENT: &str = concat!("lattice-client/", env!("CARGO_PKG_VERSION"));

const ENV_CLIENT_ID: &str = "LATTICE_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "LATTICE_CLIENT_SECRET";
const ENV_BASE_URL: &str = "LATTICE_API_URL";
const ENV_INSTANCE_TIMEOUT: &str = "LATTICE_INSTANCE_TIMEOUT_SECS";
const ENV_SNAPSHOT_TIMEOUT: &str = "LATTICE_SNAPSHOT_TIMEOUT_SECS";

/// API credential pair for the client-credentials exchange.
///
/// The secret is deliberately excluded from `Debug` output; credentials
/// must never reach logs.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration for the control plane client.
#[derive(Debug, Clone)]
pub struct ControlPlaneConfig {
    /// Control plane endpoint without the `/v1` suffix.
    pub base_url: String,
    pub credentials: Credentials,
    /// Per-request timeout for the HTTP transport.
    pub request_timeout: Duration,
    /// Retry decisions and backoff schedule for the HTTP transport.
    pub retry: RetryPolicy,
    /// Convergence deadline for instance workflows.
    pub instance_timeout: Duration,
    /// Convergence deadline for snapshot workflows.
    pub snapshot_timeout: Duration,
}

impl ControlPlaneConfig {
    /// Configuration with defaults for everything but the credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::new(client_id, client_secret),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            instance_timeout: Duration::from_secs(900),
            snapshot_timeout: Duration::from_secs(300),
        }
    }

    /// Replace the transport retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Point the client at a different endpoint (staging, a mock server).
    /// Trailing slashes are stripped so path joining stays predictable.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the instance convergence deadline.
    pub fn with_instance_timeout(mut self, timeout: Duration) -> Self {
        self.instance_timeout = timeout;
        self
    }

    /// Override the snapshot convergence deadline.
    pub fn with_snapshot_timeout(mut self, timeout: Duration) -> Self {
        self.snapshot_timeout = timeout;
        self
    }

    /// Load configuration from the environment (and a `.env` file when
    /// present).
    ///
    /// `LATTICE_CLIENT_ID` and `LATTICE_CLIENT_SECRET` are required;
    /// `LATTICE_API_URL`, `LATTICE_INSTANCE_TIMEOUT_SECS` and
    /// `LATTICE_SNAPSHOT_TIMEOUT_SECS` are optional overrides.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let client_id = require_env(ENV_CLIENT_ID)?;
        let client_secret = require_env(ENV_CLIENT_SECRET)?;

        let mut config = Self::new(client_id, client_secret);

        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        if let Some(timeout) = optional_secs(ENV_INSTANCE_TIMEOUT)? {
            config.instance_timeout = timeout;
        }
        if let Some(timeout) = optional_secs(ENV_SNAPSHOT_TIMEOUT)? {
            config.snapshot_timeout = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the endpoint is a well-formed http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| LatticeError::Config(format!("invalid base url: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LatticeError::Config(format!(
                "unsupported base url scheme: {}",
                url.scheme()
            )));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| LatticeError::Config(format!("{name} is not set")))
}

fn optional_secs(name: &str) -> Result<Option<Duration>> {
    match env::var(name) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| LatticeError::Config(format!("{name} must be a number of seconds")))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}
