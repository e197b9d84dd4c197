//! Client configuration.

use std::time::Duration;

/// Default platform hostname.
pub const DEFAULT_HOSTNAME: &str = "app.terraform.io";

/// Connection settings, fixed for the lifetime of a client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Platform hostname. A value with an explicit `http://` or `https://`
    /// scheme is used as-is, otherwise `https://` is assumed.
    pub hostname: String,

    /// API token sent as a bearer credential.
    pub token: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config for the given hostname and token.
    pub fn new(hostname: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            token: token.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL of the v2 API, always ending in a slash.
    pub fn base_url(&self) -> String {
        let host = self.hostname.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}/api/v2/", host)
        } else {
            format!("https://{}/api/v2/", host)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            token: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

// The token is a credential; keep it out of debug output.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("hostname", &self.hostname)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
