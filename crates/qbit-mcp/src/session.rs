//! Tool adapter.
//!
//! Owns the one live WebUI client and turns tool calls into client calls.
//! State is either Disconnected (no client) or Connected (a client that
//! logged in at least once; its cookie may have expired since).

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use qbit_api::QbitClient;
use qbit_config::{ConnectOverrides, Params};

use crate::format::{self, Action, NOT_CONNECTED};

/// Connection state of a [`QbitSession`].
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Holds the resolved parameters and the current client, if any.
///
/// Shared by every tool handler through an `Arc`. The slot lock is never
/// held across network I/O: handlers clone the client handle and release
/// it first. A `connect` that races with requests still running on the
/// previous client may log that client out underneath them.
pub struct QbitSession {
    params: Params,
    client: Mutex<Option<Arc<QbitClient>>>,
}

impl QbitSession {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            client: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub async fn state(&self) -> ConnectionState {
        if self.client.lock().await.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    async fn current(&self) -> Option<Arc<QbitClient>> {
        self.client.lock().await.clone()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Build a client from the overrides and log in.
    ///
    /// The new client is installed only when login succeeds; the previous
    /// one is then closed. A failed attempt leaves the current state alone.
    pub async fn connect(&self, overrides: ConnectOverrides) -> String {
        let config = overrides.resolve(&self.params);
        info!(host = %config.host, port = config.port, "connecting to qBittorrent WebUI");

        let client = match QbitClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "could not build WebUI client");
                return Action::Connect.failure().to_owned();
            }
        };

        if let Err(e) = client.login().await {
            warn!(
                error = %e,
                rejected = e.is_auth_failure(),
                base_url = %client.base_url(),
                "login failed"
            );
            return Action::Connect.failure().to_owned();
        }

        let previous = self.client.lock().await.replace(Arc::new(client));
        if let Some(previous) = previous {
            debug!(base_url = %previous.base_url(), "closing previous client");
            previous.close().await;
        }

        Action::Connect.success().to_owned()
    }

    /// Close the current client, if any, returning to Disconnected.
    pub async fn close(&self) {
        let current = self.client.lock().await.take();
        if let Some(client) = current {
            client.close().await;
        }
    }

    // ── Tools ────────────────────────────────────────────────────────

    pub async fn list_torrents(&self) -> String {
        let Some(client) = self.current().await else {
            return NOT_CONNECTED.to_owned();
        };

        let torrents = client.list_torrents().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to fetch torrents");
            Vec::new()
        });
        debug!(count = torrents.len(), "fetched torrents");

        format::render_listing(&torrents, self.params.locale)
    }

    pub async fn pause_torrent(&self, torrent_hash: &str) -> String {
        let Some(client) = self.current().await else {
            return NOT_CONNECTED.to_owned();
        };
        report(Action::Pause, client.pause(&[torrent_hash]).await)
    }

    pub async fn resume_torrent(&self, torrent_hash: &str) -> String {
        let Some(client) = self.current().await else {
            return NOT_CONNECTED.to_owned();
        };
        report(Action::Resume, client.resume(&[torrent_hash]).await)
    }

    pub async fn delete_torrent(&self, torrent_hash: &str, delete_files: bool) -> String {
        let Some(client) = self.current().await else {
            return NOT_CONNECTED.to_owned();
        };
        report(
            Action::Delete,
            client.delete(&[torrent_hash], delete_files).await,
        )
    }

    pub async fn add_magnet(&self, magnet_url: &str) -> String {
        let Some(client) = self.current().await else {
            return NOT_CONNECTED.to_owned();
        };
        report(Action::Add, client.add_by_magnet(magnet_url).await)
    }
}

fn report(action: Action, result: Result<(), qbit_api::Error>) -> String {
    if let Err(ref e) = result {
        warn!(?action, error = %e, "WebUI request failed");
    }
    action.report(result.is_ok()).to_owned()
}
