// WebUI authentication
//
// Cookie-based session login/logout. The login endpoint answers with a
// `Set-Cookie` session id; the client keeps it and replays it on every
// later request through `QbitClient::apply_session`.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::client::QbitClient;
use crate::error::Error;

/// The WebUI session cookie (`SID=...`).
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    value: SecretString,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SecretString::from(value.into()),
        }
    }

    /// Cookie name, usually `SID`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `name=value`, ready for a `Cookie` header.
    pub(crate) fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value.expose_secret())
    }
}

impl QbitClient {
    /// Authenticate with the configured username/password.
    ///
    /// `POST /api/v2/auth/login` with a form body. qBittorrent answers bad
    /// credentials with `200 Fails.` and no cookie, so a 2xx without a
    /// session cookie is treated as a rejection. On failure the previously
    /// held cookie (if any) is left as it was.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.api_url("auth/login")?;

        debug!("logging in at {}", url);

        let form = [
            ("username", self.username()),
            ("password", self.password().expose_secret()),
        ];

        let resp = self.http().post(url).form(&form).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", body.trim()),
            });
        }

        let Some(cookie) = session_cookie(&resp) else {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login rejected: {}", body.trim()),
            });
        };

        debug!(cookie = cookie.name(), "login successful");
        self.set_session(Some(cookie));
        Ok(())
    }

    /// End the current session.
    ///
    /// `POST /api/v2/auth/logout`. The local cookie is forgotten even when
    /// the daemon cannot be reached.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("auth/logout")?;

        debug!("logging out at {}", url);

        let builder = self.apply_session(self.http().post(url));
        self.set_session(None);

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: "logout rejected".into(),
            });
        }

        debug!("logout complete");
        Ok(())
    }

    /// Release the session held by this client.
    ///
    /// Logs out when a cookie is held; failures are logged and swallowed.
    /// The HTTP connection pool is released once the last handle to the
    /// client is dropped.
    pub async fn close(&self) {
        if self.has_session() {
            if let Err(e) = self.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }
        debug!(base_url = %self.base_url(), "client closed");
    }
}

/// Pick the session cookie from a login response.
///
/// Prefers a cookie whose name contains `SID` (qBittorrent 4.x uses `SID`,
/// newer builds may suffix it); otherwise the first non-empty cookie.
fn session_cookie(resp: &reqwest::Response) -> Option<SessionCookie> {
    let mut fallback = None;
    for cookie in resp.cookies() {
        if cookie.value().is_empty() {
            continue;
        }
        let candidate = SessionCookie::new(cookie.name(), cookie.value());
        if cookie.name().contains("SID") {
            return Some(candidate);
        }
        fallback.get_or_insert(candidate);
    }
    fallback
}
