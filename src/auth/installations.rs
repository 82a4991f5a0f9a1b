//! auth::installations
//!
//! GitHub App installation access token exchange.
//!
//! # Algorithm
//!
//! 1. Parse the App private key (PEM, RSA)
//! 2. Sign a short-lived assertion for the App ID
//! 3. `POST {api}/app/installations/{id}/access_tokens` with the assertion
//!    as bearer credential
//! 4. Return the `token` field of the response
//!
//! Steps 1 and 2 and the installation ID check never touch the network.
//! The token is returned to the caller and is not stored.
//!
//! # API base
//!
//! `github_url` values that reference `github.com` (and empty values) use
//! the public API. Anything else is treated as GitHub Enterprise Server and
//! gets `/api/v3` appended unless already present.
//!
//! # Example
//!
//! ```ignore
//! use git_connector::auth::installations::exchange_token;
//!
//! let token = exchange_token(&app_config, &reqwest::Client::new()).await?;
//! ```

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::assertion::{AppClaims, AppSigner};
use super::errors::AuthError;
use crate::core::types::GithubAppConfig;

/// Public GitHub API base.
pub const PUBLIC_API_BASE: &str = "https://api.github.com";

/// Enterprise Server REST path suffix.
const ENTERPRISE_API_SUFFIX: &str = "/api/v3";

/// User-Agent header for API requests.
pub(crate) const CONNECTOR_USER_AGENT: &str = "git-connector";

/// GitHub REST API version header value.
pub(crate) const GITHUB_API_VERSION: &str = "2022-11-28";

/// Response from the access token endpoint.
#[derive(Deserialize)]
struct AccessTokenResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Error body returned by the GitHub API.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Resolve the REST API base for a GitHub web URL.
pub fn api_base_url(github_url: &str) -> String {
    let trimmed = github_url.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.contains("github.com") {
        return PUBLIC_API_BASE.to_string();
    }
    if trimmed.ends_with(ENTERPRISE_API_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, ENTERPRISE_API_SUFFIX)
    }
}

/// Parse a numeric installation ID.
pub fn parse_installation_id(raw: &str) -> Result<u64, AuthError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AuthError::InvalidInstallationId(raw.to_string()))
}

/// Client for the installation access token endpoint.
#[derive(Debug, Clone)]
pub struct InstallationTokenClient {
    client: Client,
    api_base: String,
}

impl InstallationTokenClient {
    /// Create a client for the API serving `github_url`.
    pub fn new(client: Client, github_url: &str) -> Self {
        Self {
            client,
            api_base: api_base_url(github_url),
        }
    }

    /// The API base this client talks to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn token_url(&self, installation_id: u64) -> String {
        format!(
            "{}/app/installations/{}/access_tokens",
            self.api_base, installation_id
        )
    }

    fn headers(assertion: &str) -> Result<HeaderMap, AuthError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", assertion))
            .map_err(|_| AuthError::Signing("assertion is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(CONNECTOR_USER_AGENT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        Ok(headers)
    }

    /// Exchange a signed assertion for an installation access token.
    ///
    /// # Errors
    ///
    /// `AuthError::TokenExchangeFailed` on network failure, a non-2xx status,
    /// or a response without a token.
    pub async fn create_token(
        &self,
        installation_id: u64,
        assertion: &str,
    ) -> Result<String, AuthError> {
        let url = self.token_url(installation_id);
        debug!(url = %url, "requesting installation access token");

        let response = self
            .client
            .post(&url)
            .headers(Self::headers(assertion)?)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(AuthError::TokenExchangeFailed {
                status: Some(status.as_u16()),
                message: format!("{} {}", status.as_u16(), message),
            });
        }

        let data: AccessTokenResponse = response.json().await?;
        match data.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::TokenExchangeFailed {
                status: Some(status.as_u16()),
                message: "response did not contain an access token".into(),
            }),
        }
    }
}

/// Obtain an installation access token for `app`.
pub async fn exchange_token(app: &GithubAppConfig, client: &Client) -> Result<String, AuthError> {
    exchange_token_at(app, client, Utc::now()).await
}

/// Obtain an installation access token with an assertion issued at `now`.
async fn exchange_token_at(
    app: &GithubAppConfig,
    client: &Client,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let signer = AppSigner::from_pem(&app.private_key)?;
    let assertion = signer.sign(&AppClaims::issued_at(&app.app_id, now))?;
    let installation_id = parse_installation_id(&app.app_installation_id)?;

    let exchanger = InstallationTokenClient::new(client.clone(), &app.github_url);
    info!(
        app_id = %app.app_id,
        installation_id,
        api_base = %exchanger.api_base(),
        "exchanging GitHub App assertion for installation token"
    );
    exchanger.create_token(installation_id, &assertion).await
}
