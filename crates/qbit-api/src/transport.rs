// Transport configuration for building reqwest::Client instances.
//
// Keeps timeout and user-agent settings out of the client itself so a
// prebuilt `reqwest::Client` can be injected in tests.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("qbit-mcp/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Config with the given timeout (`None` disables it).
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// Cookies are not stored by reqwest: the session cookie is tracked
    /// explicitly by [`QbitClient`](crate::QbitClient).
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}
