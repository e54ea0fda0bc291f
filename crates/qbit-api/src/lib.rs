// qbit-api: Async Rust client for the qBittorrent WebUI API

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod torrents;
pub mod transport;

pub use auth::SessionCookie;
pub use client::QbitClient;
pub use config::ConnectionConfig;
pub use error::Error;
pub use models::TorrentInfo;
pub use transport::TransportConfig;
