//! cli
//!
//! Process entry for the CGI binary.
//!
//! # Responsibilities
//!
//! - Parse flags and load runtime settings
//! - Install the log subscriber (stderr only; stdout carries the response)
//! - Read one CGI request, run the handler, write one CGI response
//!
//! # Architecture
//!
//! The CLI layer is thin. Request semantics live in [`crate::handler`] and
//! [`crate::validate`]; this module only wires concrete clients into them.

pub mod args;

pub use args::Cli;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cgi::{self, CONTENT_LENGTH_VAR};
use crate::core::config::{Config, LogFormat};
use crate::forge::{GitHubClientFactory, TransportConfig};
use crate::git::Git2RemoteLister;
use crate::handler::{self, HandlerResponse, STATUS_BAD_REQUEST};
use crate::validate::Validator;

/// HTTP status sent when the connector cannot start.
const STATUS_INTERNAL_ERROR: u16 = 500;

/// Run the CGI binary.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = match Cli::try_parse_args() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => {
            let message = err.to_string().trim().to_string();
            return fail_startup(
                anyhow::Error::new(err),
                message,
                "Failed to parse connector arguments",
            );
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            let cause = format!("{:#}", err);
            return fail_startup(err, cause, "Failed to load connector configuration");
        }
    };

    init_logging(config.log_format(), config.log_level());
    if let Some(path) = config.loaded_from() {
        info!(path = %path.display(), "loaded runtime configuration");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let content_length = std::env::var(CONTENT_LENGTH_VAR).ok();
    let response = match cgi::read_request(io::stdin().lock(), content_length.as_deref()) {
        Ok(body) => runtime.block_on(handler::handle_request(&body, &validator(&config))),
        Err(err) => {
            error!(error = %err, "Failed to read request body");
            HandlerResponse::error(STATUS_BAD_REQUEST, err.to_string(), "Failed to decode request body")
        }
    };

    cgi::write_response(io::stdout().lock(), &response).context("failed to write response")?;
    Ok(())
}

/// `--help` and `--version` print to stdout and exit normally.
fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

/// Answer with a CGI 500 before exiting on a startup failure.
fn fail_startup(err: anyhow::Error, cause: String, message: &str) -> Result<()> {
    init_logging(LogFormat::Text, "info");
    error!(error = %cause, "{}", message);
    let response = HandlerResponse::error(STATUS_INTERNAL_ERROR, cause, message);
    cgi::write_response(io::stdout().lock(), &response)?;
    Err(err)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load settings")?;
    config
        .apply(&cli.overrides())
        .context("invalid command-line settings")?;
    Ok(config)
}

/// Build the validator wired to the real GitHub API and git transport.
pub fn validator(config: &Config) -> Validator {
    let transport = TransportConfig {
        skip_verify: config.skip_tls_verify(),
        additional_certs_path: config.additional_certs_path().map(|p| p.to_path_buf()),
    };
    Validator::new(
        Arc::new(GitHubClientFactory::new(transport)),
        Arc::new(Git2RemoteLister::new(config.skip_tls_verify())),
    )
}

fn init_logging(format: LogFormat, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    // A subscriber may already be installed when called twice.
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
