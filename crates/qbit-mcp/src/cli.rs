//! Clap derive structures for the `qbit-mcp` binary.

use std::path::PathBuf;

use clap::Parser;

use qbit_config::ParamArgs;

/// qbit-mcp -- qBittorrent download management over the Model Context Protocol
#[derive(Debug, Parser)]
#[command(
    name = "qbit-mcp",
    version,
    about = "Serve qBittorrent WebUI management tools over MCP",
    long_about = "Exposes connect, list_torrents, pause_torrent, resume_torrent,\n\
        delete_torrent and add_magnet as MCP tools, over stdio or streamable HTTP.\n\n\
        Every parameter X resolves as: tool argument > --X=value > X env var >\n\
        config file > default."
)]
pub struct Cli {
    #[command(flatten)]
    pub params: ParamArgs,

    /// Config file path (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "QBIT_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The config file to layer under env and flags.
    pub fn config_file(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(qbit_config::config_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use qbit_config::{Locale, Mode};

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn equals_form_flags_parse() {
        let cli = Cli::try_parse_from([
            "qbit-mcp",
            "--host=nas.local",
            "--port=9090",
            "--mode=rest",
            "--rest_port=9000",
            "--endpoint=/mcp",
            "--locale=en",
        ])
        .unwrap();

        assert_eq!(cli.params.host.as_deref(), Some("nas.local"));
        assert_eq!(cli.params.port, Some(9090));
        assert_eq!(cli.params.mode, Some(Mode::Rest));
        assert_eq!(cli.params.rest_port, Some(9000));
        assert_eq!(cli.params.endpoint.as_deref(), Some("/mcp"));
        assert_eq!(cli.params.locale, Some(Locale::En));
    }

    #[test]
    fn rest_port_accepts_kebab_alias() {
        let cli = Cli::try_parse_from(["qbit-mcp", "--rest-port=9001"]).unwrap();
        assert_eq!(cli.params.rest_port, Some(9001));
    }

    #[test]
    fn unset_flags_stay_absent() {
        let cli = Cli::try_parse_from(["qbit-mcp"]).unwrap();
        assert!(cli.params.host.is_none());
        assert!(cli.params.mode.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn unknown_mode_is_a_usage_error() {
        let err = Cli::try_parse_from(["qbit-mcp", "--mode=grpc"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
