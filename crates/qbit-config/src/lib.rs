//! Parameter resolution for the qBittorrent tool server.
//!
//! Every configuration value `x` resolves in this order: explicit tool
//! argument > `--x=value` process argument > `X` environment variable >
//! `x` in the TOML config file > built-in default. This crate covers the
//! last four layers in [`load_params`]; [`ConnectOverrides`] applies the
//! tool-argument layer on top when a `connect` call arrives.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, ValueEnum};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use qbit_api::ConnectionConfig;

/// Parameters taken from the environment verbatim. figment would parse
/// `PASSWORD=007` as the integer 7, so these bypass its value parsing.
const STRING_PARAMS: [&str; 4] = ["host", "username", "password", "endpoint"];

/// Parameters whose environment values figment parses (numbers, enums).
const TYPED_PARAMS: [&str; 5] = ["port", "mode", "rest_port", "timeout", "locale"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Enumerated parameters ───────────────────────────────────────────

/// Which tool-protocol transport the process serves.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Tool protocol over stdin/stdout
    #[default]
    Stdio,
    /// Tool protocol over streamable HTTP
    Rest,
}

/// Language of the field labels in torrent listings.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    /// Simplified Chinese labels
    #[default]
    Zh,
    /// English labels
    En,
}

// ── Process arguments ───────────────────────────────────────────────

/// `--x=value` overrides. Every field is optional so that unset flags
/// fall through to the environment, the config file, then the defaults.
#[derive(Clone, Default, Args, Serialize)]
pub struct ParamArgs {
    /// qBittorrent WebUI host [default: localhost]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// qBittorrent WebUI port [default: 8080]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// WebUI username [default: admin]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// WebUI password [default: adminadmin]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Transport to serve the tools over [default: stdio]
    #[arg(long, value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// Listen port in rest mode [default: 8081]
    #[arg(long = "rest_port", alias = "rest-port")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_port: Option<u16>,

    /// HTTP path of the tool endpoint in rest mode [default: /]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// WebUI request timeout in seconds, 0 disables [default: 30]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Language of torrent listing labels [default: zh]
    #[arg(long, value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

impl fmt::Debug for ParamArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamArgs")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("mode", &self.mode)
            .field("rest_port", &self.rest_port)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("locale", &self.locale)
            .finish()
    }
}

// ── Resolved parameters ─────────────────────────────────────────────

/// Fully resolved process parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password", deserialize_with = "secret_string")]
    pub password: SecretString,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default = "default_rest_port")]
    pub rest_port: u16,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Seconds; `0` disables the timeout.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub locale: Locale,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
            mode: Mode::default(),
            rest_port: default_rest_port(),
            endpoint: default_endpoint(),
            timeout: default_timeout(),
            locale: Locale::default(),
        }
    }
}

impl Params {
    /// WebUI request timeout, `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.starts_with('/') {
            return Err(ConfigError::Validation {
                field: "endpoint".into(),
                reason: format!("must start with '/', got '{}'", self.endpoint),
            });
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "host".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    8080
}
fn default_username() -> String {
    "admin".into()
}
fn default_password() -> SecretString {
    SecretString::from("adminadmin")
}
fn default_rest_port() -> u16 {
    8081
}
fn default_endpoint() -> String {
    "/".into()
}
fn default_timeout() -> u64 {
    30
}

fn secret_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "qbit-mcp", "qbit-mcp").map_or_else(
        || PathBuf::from("qbit-mcp.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Build the layered figment: file < environment < process arguments.
///
/// A missing config file is not an error.
pub fn figment(args: &ParamArgs, config_file: Option<&Path>) -> Figment {
    let mut figment = Figment::new();
    if let Some(path) = config_file {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Env::raw().only(&TYPED_PARAMS))
        .merge(Serialized::defaults(string_env()))
        .merge(Serialized::defaults(args))
}

/// `X` environment values for the string parameters, unparsed.
fn string_env() -> BTreeMap<&'static str, String> {
    STRING_PARAMS
        .iter()
        .filter_map(|name| {
            std::env::var(name.to_uppercase())
                .ok()
                .map(|value| (*name, value))
        })
        .collect()
}

/// Resolve process parameters from every layer below tool arguments.
pub fn load_params(args: &ParamArgs, config_file: Option<&Path>) -> Result<Params, ConfigError> {
    let params: Params = figment(args, config_file).extract()?;
    params.validate()?;
    Ok(params)
}

// ── Tool-argument layer ─────────────────────────────────────────────

/// Arguments of a `connect` tool call. Empty strings and port `0` count
/// as absent and fall back to the resolved [`Params`].
#[derive(Clone, Default)]
pub struct ConnectOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectOverrides {
    pub fn resolve(self, params: &Params) -> ConnectionConfig {
        ConnectionConfig {
            host: non_empty(self.host).unwrap_or_else(|| params.host.clone()),
            port: self.port.filter(|p| *p != 0).unwrap_or(params.port),
            username: non_empty(self.username).unwrap_or_else(|| params.username.clone()),
            password: non_empty(self.password)
                .map_or_else(|| params.password.clone(), SecretString::from),
            timeout: params.request_timeout(),
        }
    }
}

impl fmt::Debug for ConnectOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOverrides")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_apply_without_any_source() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let params = load_params(&ParamArgs::default(), None).expect("defaults load");

            assert_eq!(params.host, "localhost");
            assert_eq!(params.port, 8080);
            assert_eq!(params.username, "admin");
            assert_eq!(params.password.expose_secret(), "adminadmin");
            assert_eq!(params.mode, Mode::Stdio);
            assert_eq!(params.rest_port, 8081);
            assert_eq!(params.endpoint, "/");
            assert_eq!(params.request_timeout(), Some(Duration::from_secs(30)));
            assert_eq!(params.locale, Locale::Zh);

            Ok(())
        });
    }

    #[test]
    fn env_overrides_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "qbit.toml",
                r#"
                    host = "filehost"
                    port = 9000
                    username = "fileuser"
                "#,
            )?;
            jail.set_env("HOST", "envhost");
            jail.set_env("REST_PORT", "9191");

            let params = load_params(&ParamArgs::default(), Some(Path::new("qbit.toml")))
                .expect("layered load");

            assert_eq!(params.host, "envhost");
            assert_eq!(params.port, 9000);
            assert_eq!(params.username, "fileuser");
            assert_eq!(params.rest_port, 9191);

            Ok(())
        });
    }

    #[test]
    fn process_args_override_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HOST", "envhost");
            jail.set_env("MODE", "stdio");

            let args = ParamArgs {
                host: Some("arghost".into()),
                mode: Some(Mode::Rest),
                ..ParamArgs::default()
            };
            let params = load_params(&args, None).expect("layered load");

            assert_eq!(params.host, "arghost");
            assert_eq!(params.mode, Mode::Rest);

            Ok(())
        });
    }

    #[test]
    fn numeric_looking_env_strings_pass_through_verbatim() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("PASSWORD", "007");
            jail.set_env("USERNAME", "42");
            jail.set_env("HOST", "1.50");

            let params = load_params(&ParamArgs::default(), None).expect("verbatim strings");

            assert_eq!(params.password.expose_secret(), "007");
            assert_eq!(params.username, "42");
            assert_eq!(params.host, "1.50");

            Ok(())
        });
    }

    #[test]
    fn decimal_password_keeps_trailing_zero() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("PASSWORD", "1.50");

            let params = load_params(&ParamArgs::default(), None).expect("verbatim strings");
            assert_eq!(params.password.expose_secret(), "1.50");

            Ok(())
        });
    }

    #[test]
    fn bracketed_username_is_not_parsed_as_array() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("USERNAME", "[a,b]");

            let params = load_params(&ParamArgs::default(), None).expect("verbatim strings");
            assert_eq!(params.username, "[a,b]");

            Ok(())
        });
    }

    #[test]
    fn typed_env_values_are_still_parsed() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("PORT", "9090");
            jail.set_env("TIMEOUT", "0");
            jail.set_env("LOCALE", "en");

            let params = load_params(&ParamArgs::default(), None).expect("typed env");
            assert_eq!(params.port, 9090);
            assert_eq!(params.request_timeout(), None);
            assert_eq!(params.locale, Locale::En);

            Ok(())
        });
    }

    #[test]
    fn unknown_mode_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MODE", "carrier-pigeon");

            let result = load_params(&ParamArgs::default(), None);
            assert!(matches!(result, Err(ConfigError::Figment(_))));

            Ok(())
        });
    }

    #[test]
    fn endpoint_must_be_absolute() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ENDPOINT", "mcp");

            let result = load_params(&ParamArgs::default(), None);
            assert!(matches!(
                result,
                Err(ConfigError::Validation { ref field, .. }) if field == "endpoint"
            ));

            Ok(())
        });
    }

    #[test]
    fn zero_timeout_disables_it() {
        let params = Params {
            timeout: 0,
            ..Params::default()
        };
        assert_eq!(params.request_timeout(), None);
    }

    #[test]
    fn connect_overrides_win_over_params() {
        let params = Params::default();
        let config = ConnectOverrides {
            host: Some("h".into()),
            port: Some(1),
            username: Some("u".into()),
            password: Some("p".into()),
        }
        .resolve(&params);

        assert_eq!(config.host, "h");
        assert_eq!(config.port, 1);
        assert_eq!(config.username, "u");
        assert_eq!(config.password.expose_secret(), "p");
    }

    #[test]
    fn empty_connect_overrides_fall_back() {
        let params = Params::default();
        let config = ConnectOverrides {
            host: Some(String::new()),
            port: Some(0),
            username: None,
            password: Some(String::new()),
        }
        .resolve(&params);

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.username, "admin");
        assert_eq!(config.password.expose_secret(), "adminadmin");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn timeout_reaches_connection_config() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("TIMEOUT", "5");

            let params = load_params(&ParamArgs::default(), None).expect("timeout env");
            let config = ConnectOverrides::default().resolve(&params);
            assert_eq!(config.timeout, Some(Duration::from_secs(5)));

            let disabled = Params {
                timeout: 0,
                ..params
            };
            assert_eq!(ConnectOverrides::default().resolve(&disabled).timeout, None);

            Ok(())
        });
    }

    #[test]
    fn enum_names_are_lowercase() {
        assert_eq!("rest".parse::<Mode>().ok(), Some(Mode::Rest));
        assert_eq!(Mode::Stdio.to_string(), "stdio");
        assert_eq!(Locale::En.to_string(), "en");
    }
}
