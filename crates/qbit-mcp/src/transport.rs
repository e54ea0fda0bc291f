//! Tool-protocol transports: stdio and streamable HTTP ("rest" mode).

use rmcp::{RoleServer, ServiceExt};
use tracing::info;

use crate::error::CliError;
use crate::server::QbitServer;

/// Serve the tools over stdin/stdout until the peer closes the stream.
pub async fn serve_stdio(server: QbitServer) -> Result<(), CliError> {
    info!("serving tools over stdio");

    let service = ServiceExt::<RoleServer>::serve(server, rmcp::transport::stdio())
        .await
        .map_err(|e| CliError::Transport {
            message: format!("failed to start stdio server: {e}"),
        })?;
    service.waiting().await.map_err(|e| CliError::Transport {
        message: format!("stdio server error: {e}"),
    })?;
    Ok(())
}

/// Serve the tools over streamable HTTP on `0.0.0.0:{port}` at `endpoint`
/// until Ctrl-C.
#[cfg(feature = "rest")]
pub async fn serve_rest(server: QbitServer, port: u16, endpoint: &str) -> Result<(), CliError> {
    use rmcp::transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    };

    let http_service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let router = match mount_path(endpoint) {
        Some(path) => axum::Router::new().nest_service(path, http_service),
        None => axum::Router::new().fallback_service(http_service),
    };

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| CliError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, endpoint, "serving tools over streamable HTTP");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .map_err(|e| CliError::Transport {
            message: format!("HTTP server error: {e}"),
        })
}

#[cfg(not(feature = "rest"))]
pub async fn serve_rest(_server: QbitServer, _port: u16, _endpoint: &str) -> Result<(), CliError> {
    Err(CliError::RestUnavailable)
}

/// Nesting path for the endpoint, or `None` when it is the root.
#[cfg_attr(not(feature = "rest"), allow(dead_code))]
fn mount_path(endpoint: &str) -> Option<&str> {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn root_endpoint_uses_fallback() {
        assert_eq!(mount_path("/"), None);
        assert_eq!(mount_path("//"), None);
    }

    #[test]
    fn nested_endpoint_drops_trailing_slash() {
        assert_eq!(mount_path("/mcp"), Some("/mcp"));
        assert_eq!(mount_path("/mcp/"), Some("/mcp"));
        assert_eq!(mount_path("/api/mcp"), Some("/api/mcp"));
    }
}
