//! forge::factory
//!
//! Provider client selection and creation.
//!
//! # Design
//!
//! The validator never constructs API clients itself. It asks a
//! [`ClientFactory`] for a [`RepositoryClient`] bound to the request's
//! provider and credentials, which keeps provider specifics and the token
//! exchange out of the validation flow.
//!
//! # Credential wiring
//!
//! | API access | Client |
//! |---|---|
//! | absent | anonymous |
//! | `Token` | static bearer token |
//! | `GithubApp` | installation token from the App exchange |
//! | anything else | `ClientError::Unimplemented` |
//!
//! # Example
//!
//! ```ignore
//! use git_connector::forge::{ClientFactory, GitHubClientFactory, TransportConfig};
//! use git_connector::core::types::Provider;
//!
//! let factory = GitHubClientFactory::new(TransportConfig::default());
//! let client = factory.build_client(&Provider::Github, None).await?;
//! ```

use async_trait::async_trait;
use tracing::{debug, info};

use super::errors::ClientError;
use super::github::GitHubClient;
use super::traits::RepositoryClient;
use super::transport::TransportConfig;
use crate::auth;
use crate::core::types::{ApiAccessConfig, ApiAccessType, Provider};

/// Providers with a client implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeProvider {
    /// GitHub and GitHub Enterprise Server
    GitHub,
}

impl ForgeProvider {
    /// Provider name as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "github",
        }
    }

    /// Resolve a request provider.
    ///
    /// # Errors
    ///
    /// `UnsupportedProvider` for providers without an implementation.
    pub fn resolve(provider: &Provider) -> Result<Self, ClientError> {
        match provider {
            Provider::Github => Ok(ForgeProvider::GitHub),
            Provider::Unsupported(name) => Err(ClientError::UnsupportedProvider(name.clone())),
        }
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Builds authenticated API clients.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Build a client for `provider` authenticated per `api_access`.
    ///
    /// `None` yields an anonymous client against the public API.
    async fn build_client(
        &self,
        provider: &Provider,
        api_access: Option<&ApiAccessConfig>,
    ) -> Result<Box<dyn RepositoryClient>, ClientError>;
}

/// Factory producing reqwest-backed GitHub clients.
#[derive(Debug, Clone, Default)]
pub struct GitHubClientFactory {
    transport: TransportConfig,
}

impl GitHubClientFactory {
    /// Create a factory applying `transport` to every client it builds.
    pub fn new(transport: TransportConfig) -> Self {
        Self { transport }
    }

    async fn build_github(
        &self,
        api_access: Option<&ApiAccessConfig>,
    ) -> Result<GitHubClient, ClientError> {
        let Some(access) = api_access else {
            debug!("building anonymous GitHub client");
            let http = self.transport.build_client(None)?;
            return Ok(GitHubClient::new(http, None));
        };

        let http = self.transport.build_client(Some(&access.proxy_url))?;
        let client = GitHubClient::new(http.clone(), Some(&access.endpoint));

        match &access.access_type {
            None => {
                debug!(api_base = %client.api_base(), "building anonymous GitHub client");
                Ok(client)
            }
            Some(ApiAccessType::Token) => {
                debug!(api_base = %client.api_base(), "building token GitHub client");
                Ok(client.with_token(access.token.clone()))
            }
            Some(ApiAccessType::GithubApp) => {
                let app = access
                    .github_app
                    .as_ref()
                    .ok_or_else(|| ClientError::Unimplemented("GithubApp without app config".into()))?;
                let token = auth::exchange_token(app, &http).await?;
                info!(api_base = %client.api_base(), "building GitHub App installation client");
                Ok(client.with_token(token))
            }
            Some(ApiAccessType::Unsupported(kind)) => Err(ClientError::Unimplemented(kind.clone())),
        }
    }
}

#[async_trait]
impl ClientFactory for GitHubClientFactory {
    async fn build_client(
        &self,
        provider: &Provider,
        api_access: Option<&ApiAccessConfig>,
    ) -> Result<Box<dyn RepositoryClient>, ClientError> {
        match ForgeProvider::resolve(provider)? {
            ForgeProvider::GitHub => {
                let client = self.build_github(api_access).await?;
                Ok(Box::new(client))
            }
        }
    }
}
