//! Configuration types and CLI options.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use crate::config::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_DOCUMENT_ROOT, DEFAULT_PORT, DEFAULT_USER_AGENT,
    FRAGMENT_TIMEOUT_SECS, MAX_DOCUMENT_BYTES,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Gateway configuration.
///
/// Doubles as the CLI surface (via `clap::Parser`) and as the library
/// configuration struct; library users construct it programmatically with
/// `..Default::default()`.
///
/// # Examples
///
/// ```no_run
/// use esi_gateway::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     root: PathBuf::from("./site"),
///     port: 8080,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "esi_gateway",
    version,
    about = "Serves a static site and resolves <esi:include> directives in HTML responses"
)]
pub struct Config {
    /// Directory served as the site root
    #[arg(default_value = DEFAULT_DOCUMENT_ROOT)]
    pub root: PathBuf,

    /// TCP port to listen on (0 picks an ephemeral port)
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    pub bind: IpAddr,

    /// Externally visible origin used as the base for resolving relative
    /// include paths; defaults to the gateway's own listen address
    #[arg(long)]
    pub public_base_url: Option<Url>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-fragment fetch timeout in seconds
    #[arg(long, default_value_t = FRAGMENT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header for outbound fragment fetches
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Largest HTML document the interceptor will buffer and process;
    /// larger responses are passed through untouched
    #[arg(long, default_value_t = MAX_DOCUMENT_BYTES)]
    pub max_document_bytes: usize,

    /// Status/metrics server port (optional, disabled by default)
    #[arg(long)]
    pub status_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_DOCUMENT_ROOT),
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND_ADDR.parse().expect("default bind address is valid"),
            public_base_url: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: FRAGMENT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_document_bytes: MAX_DOCUMENT_BYTES,
            status_port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.root, PathBuf::from(DEFAULT_DOCUMENT_ROOT));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.timeout_seconds, FRAGMENT_TIMEOUT_SECS);
        assert_eq!(config.max_document_bytes, MAX_DOCUMENT_BYTES);
        assert!(config.public_base_url.is_none());
        assert!(config.status_port.is_none());
    }

    #[test]
    fn test_default_bind_is_loopback() {
        let config = Config::default();
        assert!(config.bind.is_loopback());
    }
}
