//! core::config::schema
//!
//! Runtime settings file schema.
//!
//! These settings describe how the process talks to the outside world
//! (TLS trust, logging). They never carry request data or credentials.
//!
//! # Validation
//!
//! Unknown keys are rejected at parse time. Values are checked after
//! parsing by [`FileConfig::validate`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigLoadError;

/// Log levels accepted in `[log] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Settings file contents.
///
/// # Example
///
/// ```toml
/// [tls]
/// skip_verify = false
/// additional_certs_path = "/etc/ssl/certs/extra.pem"
///
/// [log]
/// level = "info"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Outbound TLS settings
    pub tls: Option<TlsSection>,

    /// Log output settings
    pub log: Option<LogSection>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if let Some(log) = &self.log {
            log.validate()?;
        }
        if let Some(tls) = &self.tls {
            if let Some(path) = &tls.additional_certs_path {
                if path.as_os_str().is_empty() {
                    return Err(ConfigLoadError::InvalidValue(
                        "tls.additional_certs_path cannot be empty".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// `[tls]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TlsSection {
    /// Accept invalid server certificates
    pub skip_verify: Option<bool>,

    /// PEM bundle appended to the system roots
    pub additional_certs_path: Option<PathBuf>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    /// Filter level, one of [`VALID_LOG_LEVELS`]
    pub level: Option<String>,

    /// Output format
    pub format: Option<LogFormat>,
}

impl LogSection {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if let Some(level) = &self.level {
            if !VALID_LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigLoadError::InvalidValue(format!(
                    "invalid log level '{}', must be one of: {}",
                    level,
                    VALID_LOG_LEVELS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}
