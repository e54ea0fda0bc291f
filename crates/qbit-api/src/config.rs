use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::Error;

/// Everything needed to reach one qBittorrent WebUI.
///
/// Built once from resolved parameters and consumed by
/// [`QbitClient::new`](crate::QbitClient::new).
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Request timeout. `None` means requests may block indefinitely.
    pub timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// `http://{host}:{port}`
    pub fn base_url(&self) -> Result<Url, Error> {
        Ok(Url::parse(&format!("http://{}:{}", self.host, self.port))?)
    }
}
