// Torrent endpoints
//
// Listing plus the four mutating actions. The WebUI gives no structured
// confirmation for the actions (plain `Ok.` or an empty body), so success
// means "the daemon answered 2xx".

use reqwest::Method;
use tracing::debug;

use crate::client::QbitClient;
use crate::error::Error;
use crate::models::TorrentInfo;

/// Separator the WebUI expects between torrent hashes.
const HASH_SEPARATOR: &str = "|";

impl QbitClient {
    /// List all torrents.
    ///
    /// `GET /api/v2/torrents/info`. An empty body yields an empty list.
    pub async fn list_torrents(&self) -> Result<Vec<TorrentInfo>, Error> {
        let Some(value) = self.request(Method::GET, "torrents/info", None).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::new(),
        })
    }

    /// Pause torrents.
    ///
    /// `POST /api/v2/torrents/pause` with `hashes=h1|h2`.
    pub async fn pause(&self, hashes: &[&str]) -> Result<(), Error> {
        let hashes = hashes.join(HASH_SEPARATOR);
        debug!(%hashes, "pausing torrents");
        self.execute(Method::POST, "torrents/pause", Some(&[("hashes", hashes.as_str())]))
            .await?;
        Ok(())
    }

    /// Resume torrents.
    ///
    /// `POST /api/v2/torrents/resume` with `hashes=h1|h2`.
    pub async fn resume(&self, hashes: &[&str]) -> Result<(), Error> {
        let hashes = hashes.join(HASH_SEPARATOR);
        debug!(%hashes, "resuming torrents");
        self.execute(Method::POST, "torrents/resume", Some(&[("hashes", hashes.as_str())]))
            .await?;
        Ok(())
    }

    /// Delete torrents, optionally with their downloaded data.
    ///
    /// `POST /api/v2/torrents/delete` with `hashes=h1|h2&deleteFiles=true|false`.
    pub async fn delete(&self, hashes: &[&str], delete_files: bool) -> Result<(), Error> {
        let hashes = hashes.join(HASH_SEPARATOR);
        let delete_files = if delete_files { "true" } else { "false" };
        debug!(%hashes, delete_files, "deleting torrents");
        self.execute(
            Method::POST,
            "torrents/delete",
            Some(&[("hashes", hashes.as_str()), ("deleteFiles", delete_files)]),
        )
        .await?;
        Ok(())
    }

    /// Add a torrent from a magnet link.
    ///
    /// `POST /api/v2/torrents/add` with `urls=<magnet>`.
    pub async fn add_by_magnet(&self, magnet_url: &str) -> Result<(), Error> {
        debug!("adding torrent from magnet link");
        self.execute(Method::POST, "torrents/add", Some(&[("urls", magnet_url)]))
            .await?;
        Ok(())
    }
}
