//! `qbit-mcp` -- manage qBittorrent downloads from MCP clients.
//!
//! Resolves parameters, then serves the six WebUI tools over stdio
//! (default) or streamable HTTP. Logs go to stderr so they never mix with
//! the stdio protocol stream.

mod cli;
mod error;
mod format;
mod server;
mod session;
mod transport;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qbit_config::{Mode, load_params};

use crate::cli::Cli;
use crate::error::CliError;
use crate::server::QbitServer;
use crate::session::QbitSession;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_file = cli.config_file();
    let params = load_params(&cli.params, Some(&config_file))?;
    tracing::debug!(
        config = %config_file.display(),
        mode = %params.mode,
        "parameters resolved"
    );

    let mode = params.mode;
    let rest_port = params.rest_port;
    let endpoint = params.endpoint.clone();

    let session = Arc::new(QbitSession::new(params));
    let server = QbitServer::new(Arc::clone(&session));

    let served = match mode {
        Mode::Stdio => transport::serve_stdio(server).await,
        Mode::Rest => transport::serve_rest(server, rest_port, &endpoint).await,
    };

    session.close().await;
    served
}
