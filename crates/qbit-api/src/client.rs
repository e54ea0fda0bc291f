// qBittorrent WebUI HTTP client
//
// Wraps `reqwest::Client` with `/api/v2/` URL construction, the session
// cookie, and response-status mapping. Endpoint groups (auth, torrents)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use std::sync::RwLock;

use reqwest::Method;
use reqwest::header::COOKIE;
use secrecy::SecretString;
use tracing::{debug, trace};
use url::Url;

use crate::auth::SessionCookie;
use crate::config::ConnectionConfig;
use crate::error::Error;
use crate::transport::TransportConfig;

const API_PREFIX: &str = "api/v2/";
const BODY_PREVIEW_CHARS: usize = 200;

/// Session-authenticated client for one qBittorrent WebUI.
///
/// Holds at most one session cookie. The cookie is acquired lazily: a
/// request made while no cookie is held logs in first. A cookie that is
/// present but rejected by the daemon is kept as-is and not refreshed.
pub struct QbitClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    session: RwLock<Option<SessionCookie>>,
}

impl QbitClient {
    /// Create a client from a `ConnectionConfig`. Does not log in.
    pub fn new(config: ConnectionConfig) -> Result<Self, Error> {
        let http = TransportConfig::with_timeout(config.timeout).build_client()?;
        Self::with_client(http, config)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: ConnectionConfig) -> Result<Self, Error> {
        let base_url = config.base_url()?;
        Ok(Self {
            http,
            base_url,
            username: config.username,
            password: config.password,
            session: RwLock::new(None),
        })
    }

    /// The WebUI root, e.g. `http://localhost:8080/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    // ── Session cookie ───────────────────────────────────────────────

    /// Whether a session cookie is currently held.
    pub fn has_session(&self) -> bool {
        self.session.read().expect("session lock poisoned").is_some()
    }

    pub(crate) fn set_session(&self, cookie: Option<SessionCookie>) {
        *self.session.write().expect("session lock poisoned") = cookie;
    }

    /// Attach the session cookie, if any, to a request builder.
    pub(crate) fn apply_session(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.session.read().expect("session lock poisoned");
        match guard.as_ref() {
            Some(cookie) => builder.header(COOKIE, cookie.header_value()),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/v2/{endpoint}`.
    pub(crate) fn api_url(&self, endpoint: &str) -> Result<Url, Error> {
        let endpoint = endpoint.trim_start_matches('/');
        Ok(self.base_url.join(&format!("{API_PREFIX}{endpoint}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Authenticated request returning the parsed JSON body.
    ///
    /// Logs in first when no session cookie is held; if that login fails
    /// the target endpoint is never called. An empty body yields `None`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<Option<serde_json::Value>, Error> {
        let resp = self.execute(method, endpoint, form).await?;
        let body = resp.text().await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body,
            })
    }

    /// Authenticated request whose body is not inspected.
    ///
    /// Returns the response only when the daemon answered with a 2xx status.
    pub(crate) async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<reqwest::Response, Error> {
        if !self.has_session() {
            trace!("no session cookie held, logging in first");
            self.login().await?;
        }

        let url = self.api_url(endpoint)?;
        debug!("{method} {url}");

        let mut builder = self.apply_session(self.http.request(method, url));
        if let Some(form) = form {
            builder = builder.form(form);
        }

        let resp = builder.send().await?;
        check_status(resp).await
    }
}

/// Map non-2xx responses to errors. The session cookie is left untouched.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            message: "session rejected by WebUI (HTTP 403)".into(),
        });
    }

    Err(Error::Api {
        status: status.as_u16(),
        message: preview(&body),
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
