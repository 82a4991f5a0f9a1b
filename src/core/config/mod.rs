//! core::config
//!
//! Runtime settings loading.
//!
//! # Overview
//!
//! The connector reads one optional TOML settings file at startup. Request
//! data never comes from here; only process-wide concerns do (TLS trust and
//! logging).
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Settings file
//! 3. CLI flags and their environment variables ([`ConfigOverrides`])
//!
//! # Locations
//!
//! Searched in order:
//! 1. `--config <path>` / `$GIT_CONNECTOR_CONFIG` (must exist)
//! 2. `$XDG_CONFIG_HOME/git-connector/config.toml`
//! 3. `~/.git-connector/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use git_connector::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("skip TLS verify: {}", config.skip_tls_verify());
//! println!("log level: {}", config.log_level());
//! ```

pub mod schema;

pub use schema::{FileConfig, LogFormat, LogSection, TlsSection};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name used under the XDG config home and the home directory.
const APP_DIR: &str = "git-connector";

/// Errors from loading runtime settings.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub skip_tls_verify: Option<bool>,
    pub additional_certs_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings file (defaults when none was found)
    pub file: FileConfig,
    /// Path the settings were loaded from
    path: Option<PathBuf>,
}

impl Config {
    /// Load settings from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path cannot be read, or if a file
    /// exists but cannot be parsed or holds invalid values. A missing file
    /// in the default locations is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigLoadError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
        Self::load_from_locations(xdg.as_deref(), dirs::home_dir().as_deref())
    }

    /// Load from the XDG config home, then the home directory.
    fn load_from_locations(
        xdg_home: Option<&Path>,
        home: Option<&Path>,
    ) -> Result<Config, ConfigLoadError> {
        let candidates = [
            xdg_home.map(|dir| dir.join(APP_DIR).join("config.toml")),
            home.map(|dir| dir.join(format!(".{}", APP_DIR)).join("config.toml")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                return Self::load_file(&path);
            }
        }

        Ok(Config::default())
    }

    fn load_file(path: &Path) -> Result<Config, ConfigLoadError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigLoadError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig =
            toml::from_str(&contents).map_err(|e| ConfigLoadError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        file.validate()?;

        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Apply command-line overrides on top of the file values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError::InvalidValue` if an override is invalid.
    pub fn apply(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigLoadError> {
        if overrides.skip_tls_verify.is_some() || overrides.additional_certs_path.is_some() {
            let tls = self.file.tls.get_or_insert_with(TlsSection::default);
            if let Some(skip) = overrides.skip_tls_verify {
                tls.skip_verify = Some(skip);
            }
            if let Some(path) = &overrides.additional_certs_path {
                tls.additional_certs_path = Some(path.clone());
            }
        }

        if overrides.log_level.is_some() || overrides.log_format.is_some() {
            let log = self.file.log.get_or_insert_with(LogSection::default);
            if let Some(level) = &overrides.log_level {
                log.level = Some(level.clone());
            }
            if let Some(format) = overrides.log_format {
                log.format = Some(format);
            }
        }

        self.file.validate()
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    /// Whether server certificate verification is skipped.
    ///
    /// Defaults to `false`.
    pub fn skip_tls_verify(&self) -> bool {
        self.file
            .tls
            .as_ref()
            .and_then(|t| t.skip_verify)
            .unwrap_or(false)
    }

    /// Additional CA bundle, if configured.
    pub fn additional_certs_path(&self) -> Option<&Path> {
        self.file
            .tls
            .as_ref()
            .and_then(|t| t.additional_certs_path.as_deref())
    }

    /// Log filter level.
    ///
    /// Defaults to "info".
    pub fn log_level(&self) -> &str {
        self.file
            .log
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    /// Log line format.
    ///
    /// Defaults to text.
    pub fn log_format(&self) -> LogFormat {
        self.file
            .log
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }

    /// Path the settings were loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
