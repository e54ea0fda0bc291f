// WebUI response types
//
// `torrents/info` returns an array of flat objects with 50+ fields that
// shift between qBittorrent releases. The fields we render are modelled
// explicitly with `#[serde(default)]`; everything else lands in `extra`.

use serde::{Deserialize, Serialize};

/// One entry from `GET /api/v2/torrents/info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TorrentInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    /// `downloading`, `pausedUP`, `stalledDL`, ...
    #[serde(default)]
    pub state: Option<String>,
    /// Completion in `0.0..=1.0`.
    #[serde(default)]
    pub progress: f64,
    /// Total selected size in bytes.
    #[serde(default)]
    pub size: i64,
    /// Download rate in bytes/sec.
    #[serde(default)]
    pub dlspeed: i64,
    /// Upload rate in bytes/sec.
    #[serde(default)]
    pub upspeed: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
