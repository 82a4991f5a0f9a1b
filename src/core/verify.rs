//! core::verify
//!
//! Structural verification of connector configuration.
//!
//! One function per auth variant. Each checks that the fields its variant
//! needs are present and non-empty, and rejects values this connector does
//! not support.
//!
//! # Invariants
//!
//! - Never performs I/O
//! - Fails on the first missing field
//! - Runs before any network call for the same variant

use thiserror::Error;

use super::types::{
    ApiAccessConfig, ApiAccessType, GithubAppConfig, HttpAuthConfig, HttpAuthMethod,
    SshAuthConfig, SshAuthMechanism, SshKeyMethod,
};

/// Errors from configuration verification.
///
/// Messages name the offending field and never include secret values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required field is absent or empty.
    #[error("{0} is missing")]
    Missing(&'static str),

    /// A field holds a value this connector cannot act on.
    #[error("{field} {value} is not supported")]
    Unsupported {
        /// Human-readable field name
        field: &'static str,
        /// The value received
        value: String,
    },
}

/// Verify the repository URL is present.
pub fn verify_repository(repo: &str) -> Result<(), ConfigError> {
    if repo.is_empty() {
        return Err(ConfigError::Missing("Validation repository URL"));
    }
    Ok(())
}

/// Verify HTTP repository credentials.
///
/// Returns the config back so callers can dispatch on a verified value.
pub fn verify_http_auth(config: Option<&HttpAuthConfig>) -> Result<&HttpAuthConfig, ConfigError> {
    let config = config.ok_or(ConfigError::Missing("HTTP Auth config"))?;
    let method = config
        .auth_method
        .as_ref()
        .ok_or(ConfigError::Missing("HTTP Auth method"))?;

    match method {
        HttpAuthMethod::Token => {
            if config.token.is_empty() {
                return Err(ConfigError::Missing("HTTP Auth token"));
            }
        }
        HttpAuthMethod::GithubApp => {
            verify_github_app(config.github_app.as_ref())?;
        }
        HttpAuthMethod::Password | HttpAuthMethod::Anonymous => {}
        HttpAuthMethod::Unsupported(value) => {
            return Err(ConfigError::Unsupported {
                field: "HTTP Auth method",
                value: value.clone(),
            });
        }
    }

    Ok(config)
}

/// Verify SSH repository credentials.
///
/// Only [`SshAuthMechanism::SshKey`] is supported; Kerberos fails closed.
pub fn verify_ssh_auth(config: Option<&SshAuthConfig>) -> Result<&SshAuthConfig, ConfigError> {
    let config = config.ok_or(ConfigError::Missing("SSH Auth"))?;

    match config.auth_mechanism.as_ref() {
        Some(SshAuthMechanism::SshKey) => {}
        Some(other) => {
            return Err(ConfigError::Unsupported {
                field: "SSH Auth mechanism",
                value: other.to_string(),
            });
        }
        None => return Err(ConfigError::Missing("SSH Auth mechanism")),
    }

    if config.username.is_empty() {
        return Err(ConfigError::Missing("SSH Auth username"));
    }

    match config.ssh_key_auth_method.as_ref() {
        Some(SshKeyMethod::KeyReference) => {
            if config.ssh_key.is_empty() {
                return Err(ConfigError::Missing("SSH Auth private key"));
            }
        }
        Some(SshKeyMethod::KeyPath) => {
            if config.ssh_key_path.is_empty() {
                return Err(ConfigError::Missing("SSH Auth private key path"));
            }
        }
        Some(SshKeyMethod::Password) => {
            if config.password.is_empty() {
                return Err(ConfigError::Missing("SSH Auth password"));
            }
        }
        Some(SshKeyMethod::Unsupported(value)) => {
            return Err(ConfigError::Unsupported {
                field: "SSH Auth key method",
                value: value.clone(),
            });
        }
        None => return Err(ConfigError::Missing("SSH Auth key method")),
    }

    Ok(config)
}

/// Verify provider API credentials.
///
/// An unrecognized access type passes here; the client factory rejects it
/// as unimplemented.
pub fn verify_api_access(config: &ApiAccessConfig) -> Result<(), ConfigError> {
    match config.access_type.as_ref() {
        None => Err(ConfigError::Missing("API Access type")),
        Some(ApiAccessType::Token) => {
            if config.token.is_empty() {
                return Err(ConfigError::Missing("API Access token"));
            }
            Ok(())
        }
        Some(ApiAccessType::GithubApp) => verify_github_app(config.github_app.as_ref()).map(|_| ()),
        Some(ApiAccessType::Unsupported(_)) => Ok(()),
    }
}

/// Verify GitHub App credentials are fully populated.
pub fn verify_github_app(
    config: Option<&GithubAppConfig>,
) -> Result<&GithubAppConfig, ConfigError> {
    let app = config.ok_or(ConfigError::Missing("Github App config"))?;
    if app.app_id.is_empty() {
        return Err(ConfigError::Missing("Github App ID"));
    }
    if app.app_installation_id.is_empty() {
        return Err(ConfigError::Missing("Github App Installation ID"));
    }
    if app.private_key.is_empty() {
        return Err(ConfigError::Missing("Github App private key"));
    }
    Ok(app)
}
