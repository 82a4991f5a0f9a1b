//! validate
//!
//! Validation orchestrator.
//!
//! # Lifecycle
//!
//! ```text
//! [api_access?] verify -> build client -> API probe
//!        |
//! auth_type: Http -> verify -> transport probe (or installation probe)
//!            Ssh  -> verify -> transport probe
//!        |
//!     SUCCESS
//! ```
//!
//! The first failure ends the run and becomes the response.
//!
//! # Invariants
//!
//! - Verification for a phase runs before any network call of that phase
//! - A failed API access phase means repository probes are never invoked
//! - Only `SUCCESS` and `FAILURE` verdicts are produced
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use git_connector::validate::Validator;
//!
//! let validator = Validator::new(Arc::new(factory), Arc::new(lister));
//! let response = validator.validate(&request.provider, &params).await;
//! ```

mod errors;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::auth::api_base_url;
use crate::core::response::{ErrorDetail, ValidationResponse};
use crate::core::types::{
    ApiAccessConfig, AuthType, ConnectorConfig, HttpAuthConfig, HttpAuthMethod, Provider,
};
use crate::core::verify::{
    verify_api_access, verify_github_app, verify_http_auth, verify_ssh_auth, ConfigError,
};
use crate::forge::ClientFactory;
use crate::git::RemoteLister;
use crate::probe;

pub use errors::ValidationError;

/// Phase of a validation run, named in failure summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ApiAccess,
    RepositoryAccess,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::ApiAccess => write!(f, "API access"),
            Phase::RepositoryAccess => write!(f, "repository access"),
        }
    }
}

/// Runs the validation phases against injected clients.
#[derive(Clone)]
pub struct Validator {
    factory: Arc<dyn ClientFactory>,
    lister: Arc<dyn RemoteLister>,
}

impl Validator {
    /// Create a validator from a client factory and a remote lister.
    pub fn new(factory: Arc<dyn ClientFactory>, lister: Arc<dyn RemoteLister>) -> Self {
        Self { factory, lister }
    }

    /// Validate `config` and produce the response verdict.
    pub async fn validate(
        &self,
        provider: &Provider,
        config: &ConnectorConfig,
    ) -> ValidationResponse {
        if let Some(access) = config.api_access.as_ref() {
            if let Err(err) = self.validate_api_access(provider, access).await {
                return failure(Phase::ApiAccess, &err);
            }
        }

        if let Err(err) = self.validate_repository_access(provider, config).await {
            return failure(Phase::RepositoryAccess, &err);
        }

        info!("Validation successful");
        ValidationResponse::success()
    }

    async fn validate_api_access(
        &self,
        provider: &Provider,
        access: &ApiAccessConfig,
    ) -> Result<(), ValidationError> {
        verify_api_access(access)?;
        let client = self.factory.build_client(provider, Some(access)).await?;
        probe::probe_api_access(client.as_ref(), access.is_github_app()).await?;
        info!(client = client.name(), "API access validated");
        Ok(())
    }

    async fn validate_repository_access(
        &self,
        provider: &Provider,
        config: &ConnectorConfig,
    ) -> Result<(), ValidationError> {
        match config.auth_type.as_ref() {
            Some(AuthType::Http) => {
                let http = verify_http_auth(config.http_auth.as_ref())?;
                self.validate_http(provider, &config.repo, http).await
            }
            Some(AuthType::Ssh) => {
                let ssh = verify_ssh_auth(config.ssh_auth.as_ref())?;
                probe::probe_ssh(self.lister.as_ref(), &config.repo, ssh)?;
                Ok(())
            }
            Some(AuthType::Unsupported(value)) => Err(ConfigError::Unsupported {
                field: "Auth type",
                value: value.clone(),
            }
            .into()),
            None => Err(ConfigError::Missing("Auth type").into()),
        }
    }

    async fn validate_http(
        &self,
        provider: &Provider,
        repo: &str,
        http: &HttpAuthConfig,
    ) -> Result<(), ValidationError> {
        match http.auth_method.as_ref() {
            Some(HttpAuthMethod::GithubApp) => {
                let app = verify_github_app(http.github_app.as_ref())?;
                let endpoint = api_base_url(&app.github_url);
                debug!(api_base = %endpoint, "probing repository access by installation");
                let access = ApiAccessConfig::github_app(app.clone(), endpoint);
                let client = self.factory.build_client(provider, Some(&access)).await?;
                probe::probe_installation_access(client.as_ref()).await?;
            }
            _ => {
                probe::probe_http(self.lister.as_ref(), repo, http)?;
            }
        }
        Ok(())
    }
}

fn failure(phase: Phase, err: &ValidationError) -> ValidationResponse {
    let message = err.to_string();
    let summary = format!("Failed validating {}: {}", phase, message);
    error!(code = err.code(), "{}", summary);
    ValidationResponse::failure(
        ErrorDetail {
            reason: err.reason(),
            message,
            code: err.code(),
        },
        summary,
    )
}
