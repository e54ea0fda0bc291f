//! MCP tool surface.
//!
//! Thin layer over [`QbitSession`]: every tool deserializes its arguments,
//! delegates, and wraps the returned text in a successful tool result.
//! Failures are reported in the text, never as protocol errors.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;

use qbit_config::ConnectOverrides;

use crate::session::QbitSession;

const SERVER_NAME: &str = "qbittorrent";
const INSTRUCTIONS: &str = "Manage qBittorrent downloads. Call `connect` first; \
    the other tools answer with a not-connected message until it succeeds.";

// ── Tool arguments ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ConnectArgs {
    /// QBittorrent WebUI host
    #[serde(default)]
    pub host: Option<String>,
    /// QBittorrent WebUI port
    #[serde(default)]
    pub port: Option<u16>,
    /// WebUI username
    #[serde(default)]
    pub username: Option<String>,
    /// WebUI password
    #[serde(default)]
    pub password: Option<String>,
}

impl From<ConnectArgs> for ConnectOverrides {
    fn from(args: ConnectArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            username: args.username,
            password: args.password,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TorrentHashArgs {
    /// Hash of the torrent
    pub torrent_hash: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteTorrentArgs {
    /// Hash of the torrent to delete
    pub torrent_hash: String,
    /// Whether to delete downloaded files
    #[serde(default)]
    pub delete_files: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddMagnetArgs {
    /// Magnet URL of the torrent
    pub magnet_url: String,
}

// ── Server ───────────────────────────────────────────────────────────

/// Tool handler shared by every transport session.
///
/// Cheap to clone; all clones drive the same [`QbitSession`].
#[derive(Clone)]
pub struct QbitServer {
    session: Arc<QbitSession>,
    tool_router: ToolRouter<Self>,
}

fn text(reply: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(reply)]))
}

#[tool_router]
impl QbitServer {
    pub fn new(session: Arc<QbitSession>) -> Self {
        Self {
            session,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Connect to QBittorrent WebUI. Omitted arguments fall back to the server's configured values.")]
    async fn connect(
        &self,
        Parameters(args): Parameters<ConnectArgs>,
    ) -> Result<CallToolResult, McpError> {
        text(self.session.connect(args.into()).await)
    }

    #[tool(description = "Get list of all torrents and their download information.")]
    async fn list_torrents(&self) -> Result<CallToolResult, McpError> {
        text(self.session.list_torrents().await)
    }

    #[tool(description = "Pause a torrent by its hash.")]
    async fn pause_torrent(
        &self,
        Parameters(args): Parameters<TorrentHashArgs>,
    ) -> Result<CallToolResult, McpError> {
        text(self.session.pause_torrent(&args.torrent_hash).await)
    }

    #[tool(description = "Resume a paused torrent by its hash.")]
    async fn resume_torrent(
        &self,
        Parameters(args): Parameters<TorrentHashArgs>,
    ) -> Result<CallToolResult, McpError> {
        text(self.session.resume_torrent(&args.torrent_hash).await)
    }

    #[tool(description = "Delete a torrent by its hash, optionally with its downloaded files.")]
    async fn delete_torrent(
        &self,
        Parameters(args): Parameters<DeleteTorrentArgs>,
    ) -> Result<CallToolResult, McpError> {
        text(
            self.session
                .delete_torrent(&args.torrent_hash, args.delete_files)
                .await,
        )
    }

    #[tool(description = "Add a new torrent from magnet link.")]
    async fn add_magnet(
        &self,
        Parameters(args): Parameters<AddMagnetArgs>,
    ) -> Result<CallToolResult, McpError> {
        text(self.session.add_magnet(&args.magnet_url).await)
    }
}

#[tool_handler]
impl ServerHandler for QbitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }
}
