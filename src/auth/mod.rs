//! auth - GitHub App authentication
//!
//! Turns a GitHub App configuration into an installation access token.
//!
//! # Architecture
//!
//! The exchange happens in two steps:
//! - Sign a short-lived RS256 assertion with the App private key
//!   ([`AppSigner`], [`AppClaims`])
//! - Trade the assertion for an installation access token
//!   ([`InstallationTokenClient`])
//!
//! Nothing is cached. Every request performs a fresh exchange and drops the
//! token once the probe it authenticates has finished.
//!
//! # Security
//!
//! The private key, the assertion and the installation token MUST never
//! appear in logs, error messages or debug output.
//!
//! # Example
//!
//! ```ignore
//! use git_connector::auth::exchange_token;
//!
//! let token = exchange_token(&app_config, &reqwest::Client::new()).await?;
//! ```

mod assertion;
mod errors;
pub mod installations;

pub use assertion::{AppClaims, AppSigner, ASSERTION_LIFETIME_SECS, CLOCK_DRIFT_SECS};
pub use errors::AuthError;
pub use installations::{
    api_base_url, exchange_token, parse_installation_id,
    InstallationTokenClient, PUBLIC_API_BASE,
};
