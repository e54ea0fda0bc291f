//! CLI error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use qbit_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(qbit_mcp::config),
        help(
            "Each parameter X can be given as --X=value, an X environment variable,\n\
             or an entry in the config file."
        )
    )]
    Config(#[from] ConfigError),

    // ── Transport ────────────────────────────────────────────────────

    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(qbit_mcp::bind),
        help("Pick a free port with --rest_port=PORT or the REST_PORT env var.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("RestMCP transport is not available. Rebuild with the `rest` feature enabled.")]
    #[diagnostic(code(qbit_mcp::rest_unavailable))]
    RestUnavailable,

    #[error("Tool transport failed: {message}")]
    #[diagnostic(code(qbit_mcp::transport))]
    Transport { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::USAGE,
            Self::Bind { .. } | Self::RestUnavailable | Self::Transport { .. } => {
                exit_code::GENERAL
            }
        }
    }
}
