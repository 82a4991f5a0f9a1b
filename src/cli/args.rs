//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! The binary runs under a CGI server, so every flag also reads an
//! environment variable. Flags override the settings file.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::core::config::{ConfigOverrides, LogFormat};

/// git-connector-cgi - validate git repository credentials over CGI
#[derive(Parser, Debug)]
#[command(name = "git-connector-cgi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file to load instead of the default locations
    #[arg(long, env = "GIT_CONNECTOR_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Accept any server certificate when probing
    #[arg(
        long,
        env = "GIT_CONNECTOR_SKIP_TLS_VERIFY",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub skip_tls_verify: bool,

    /// PEM bundle of additional trusted CA certificates
    #[arg(long, env = "GIT_CONNECTOR_ADDITIONAL_CERTS_PATH", value_name = "PATH")]
    pub additional_certs_path: Option<PathBuf>,

    /// Log filter level (error, warn, info, debug, trace)
    #[arg(long, env = "GIT_CONNECTOR_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log line format
    #[arg(long, env = "GIT_CONNECTOR_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// Errors are returned rather than printed so the caller can still
    /// answer with a CGI response.
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Parser::try_parse()
    }

    /// Settings overrides carried by the flags.
    ///
    /// An unset `--skip-tls-verify` leaves the file value in place.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            skip_tls_verify: self.skip_tls_verify.then_some(true),
            additional_certs_path: self.additional_certs_path.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}
