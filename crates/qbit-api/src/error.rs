use thiserror::Error;

/// Top-level error type for the `qbit-api` crate.
///
/// Every failure the WebUI client can hit lands here. The tool layer
/// collapses all of them into a single "Failed to ..." line, so the
/// variants mostly matter for logging and tests.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, banned IP) or a request was
    /// refused because the session is no longer accepted.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response from the WebUI.
    #[error("WebUI API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the daemon refused our credentials or session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn authentication_is_auth_failure() {
        let err = Error::Authentication {
            message: "Fails.".into(),
        };
        assert!(err.is_auth_failure());
    }

    #[test]
    fn api_error_reports_status() {
        let err = Error::Api {
            status: 409,
            message: "conflict".into(),
        };
        assert!(!err.is_auth_failure());
        assert_eq!(err.to_string(), "WebUI API error (HTTP 409): conflict");
    }
}
