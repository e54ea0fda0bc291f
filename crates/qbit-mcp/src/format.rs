//! Text rendering for tool results.
//!
//! Every tool answers with plain text: a fixed success/failure line per
//! action, or a multi-line block per torrent for listings.

use qbit_api::TorrentInfo;
use qbit_config::Locale;

pub const NOT_CONNECTED: &str = "Not connected to QBittorrent. Use connect() first.";
pub const NO_TORRENTS: &str = "No torrents found or failed to fetch torrents.";

const BLOCK_SEPARATOR: &str = "\n---\n";
const UNKNOWN: &str = "Unknown";
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

// ── Action outcomes ──────────────────────────────────────────────────

/// A tool action whose result is reported as one of two fixed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    Pause,
    Resume,
    Delete,
    Add,
}

impl Action {
    pub fn success(self) -> &'static str {
        match self {
            Self::Connect => "Successfully connected to QBittorrent WebUI",
            Self::Pause => "Successfully paused torrent",
            Self::Resume => "Successfully resumed torrent",
            Self::Delete => "Successfully deleted torrent",
            Self::Add => "Successfully added torrent",
        }
    }

    pub fn failure(self) -> &'static str {
        match self {
            Self::Connect => "Failed to connect to QBittorrent WebUI",
            Self::Pause => "Failed to pause torrent",
            Self::Resume => "Failed to resume torrent",
            Self::Delete => "Failed to delete torrent",
            Self::Add => "Failed to add torrent",
        }
    }

    pub fn report(self, ok: bool) -> &'static str {
        if ok { self.success() } else { self.failure() }
    }
}

// ── Number formatting ────────────────────────────────────────────────

/// `0.5` → `"50.0%"`
pub fn fmt_progress(progress: f64) -> String {
    format!("{:.1}%", progress * 100.0)
}

/// Bytes → GiB with two decimals, e.g. `"1.00 GB"`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_size(bytes: i64) -> String {
    format!("{:.2} GB", bytes as f64 / GIB)
}

/// Bytes/sec → MiB/s with one decimal, e.g. `"1.0 MB/s"`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_speed(bytes_per_sec: i64) -> String {
    format!("{:.1} MB/s", bytes_per_sec as f64 / MIB)
}

// ── Torrent listing ──────────────────────────────────────────────────

struct Labels {
    name: &'static str,
    hash: &'static str,
    state: &'static str,
    progress: &'static str,
    size: &'static str,
    download: &'static str,
    upload: &'static str,
}

const ZH_LABELS: Labels = Labels {
    name: "名称",
    hash: "哈希值",
    state: "状态",
    progress: "进度",
    size: "大小",
    download: "下载速度",
    upload: "上传速度",
};

const EN_LABELS: Labels = Labels {
    name: "Name",
    hash: "Hash",
    state: "State",
    progress: "Progress",
    size: "Size",
    download: "Download speed",
    upload: "Upload speed",
};

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::Zh => &ZH_LABELS,
        Locale::En => &EN_LABELS,
    }
}

/// One torrent as a newline-led block of `label: value` lines.
pub fn render_torrent(torrent: &TorrentInfo, locale: Locale) -> String {
    let l = labels(locale);
    format!(
        "\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}",
        l.name,
        torrent.name.as_deref().unwrap_or(UNKNOWN),
        l.hash,
        torrent.hash.as_deref().unwrap_or(UNKNOWN),
        l.state,
        torrent.state.as_deref().unwrap_or(UNKNOWN),
        l.progress,
        fmt_progress(torrent.progress),
        l.size,
        fmt_size(torrent.size),
        l.download,
        fmt_speed(torrent.dlspeed),
        l.upload,
        fmt_speed(torrent.upspeed),
    )
}

/// All torrents joined by a `---` line, or [`NO_TORRENTS`] when empty.
pub fn render_listing(torrents: &[TorrentInfo], locale: Locale) -> String {
    if torrents.is_empty() {
        return NO_TORRENTS.to_owned();
    }
    torrents
        .iter()
        .map(|t| render_torrent(t, locale))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn torrent() -> TorrentInfo {
        TorrentInfo {
            name: Some("debian-12.iso".into()),
            hash: Some("abc123".into()),
            state: Some("downloading".into()),
            progress: 0.5,
            size: 1_073_741_824,
            dlspeed: 1_048_576,
            upspeed: 0,
            ..TorrentInfo::default()
        }
    }

    #[test]
    fn numbers_use_binary_units() {
        assert_eq!(fmt_progress(0.5), "50.0%");
        assert_eq!(fmt_size(1_073_741_824), "1.00 GB");
        assert_eq!(fmt_speed(1_048_576), "1.0 MB/s");
        assert_eq!(fmt_progress(1.0), "100.0%");
        assert_eq!(fmt_size(0), "0.00 GB");
    }

    #[test]
    fn zh_block_layout() {
        let expected = "\n名称: debian-12.iso\n哈希值: abc123\n状态: downloading\n进度: 50.0%\n大小: 1.00 GB\n下载速度: 1.0 MB/s\n上传速度: 0.0 MB/s";
        assert_eq!(render_torrent(&torrent(), Locale::Zh), expected);
    }

    #[test]
    fn en_labels() {
        let block = render_torrent(&torrent(), Locale::En);
        assert!(block.contains("Name: debian-12.iso"));
        assert!(block.contains("Download speed: 1.0 MB/s"));
    }

    #[test]
    fn missing_fields_render_unknown() {
        let block = render_torrent(&TorrentInfo::default(), Locale::En);
        assert!(block.contains("Name: Unknown"));
        assert!(block.contains("Hash: Unknown"));
        assert!(block.contains("Progress: 0.0%"));
    }

    #[test]
    fn listing_joins_blocks() {
        let listing = render_listing(&[torrent(), torrent()], Locale::Zh);
        assert_eq!(listing.matches("\n---\n").count(), 1);
        assert!(listing.starts_with("\n名称"));
    }

    #[test]
    fn empty_listing() {
        assert_eq!(render_listing(&[], Locale::Zh), NO_TORRENTS);
    }

    #[test]
    fn action_report() {
        assert_eq!(Action::Delete.report(true), "Successfully deleted torrent");
        assert_eq!(Action::Add.report(false), "Failed to add torrent");
        assert_eq!(
            Action::Connect.report(false),
            "Failed to connect to QBittorrent WebUI"
        );
    }
}
