//! forge::github
//!
//! GitHub REST client for repository listing.
//!
//! # Design
//!
//! Two endpoints are used, each asking for a single entry:
//! - `GET /user/repos?page=1&per_page=1` for user and token credentials
//! - `GET /installation/repositories?page=1&per_page=1` for App
//!   installation tokens
//!
//! Responses are never turned into errors here. The status and, on failure,
//! the `message` field of GitHub's error body are handed back to the caller.
//!
//! # Authentication
//!
//! The client holds at most one static bearer token. Anonymous clients send
//! no `Authorization` header.
//!
//! # Example
//!
//! ```ignore
//! use git_connector::forge::github::GitHubClient;
//! use git_connector::forge::RepositoryClient;
//!
//! let client = GitHubClient::new(reqwest::Client::new(), None)
//!     .with_token("ghp_xxx");
//! let listing = client.list_repositories().await?;
//! println!("status {}", listing.status);
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use super::traits::{ForgeError, RepositoryClient, RepositoryListing};
use crate::auth::installations::GITHUB_API_VERSION;
use crate::auth::PUBLIC_API_BASE;

/// Listing page size.
const PER_PAGE: &str = "1";

/// GitHub repository listing client.
pub struct GitHubClient {
    /// HTTP client carrying TLS and proxy settings
    client: Client,
    /// Static bearer token
    token: Option<String>,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("has_token", &self.token.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubClient {
    /// Create an anonymous client.
    ///
    /// `api_base` defaults to the public API when `None` or empty.
    pub fn new(client: Client, api_base: Option<&str>) -> Self {
        let api_base = api_base
            .map(|base| base.trim().trim_end_matches('/'))
            .filter(|base| !base.is_empty())
            .unwrap_or(PUBLIC_API_BASE)
            .to_string();
        Self {
            client,
            token: None,
            api_base,
        }
    }

    /// Authenticate requests with a static bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whether requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ForgeError::NetworkError("token contains invalid header characters".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        Ok(headers)
    }

    async fn list(&self, path: &str) -> Result<RepositoryListing, ForgeError> {
        let url = format!("{}{}", self.api_base, path);
        debug!(url = %url, authenticated = self.is_authenticated(), "listing repositories");

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(&[("page", "1"), ("per_page", PER_PAGE)])
            .send()
            .await?;

        Ok(into_listing(response).await)
    }
}

/// Error body returned by the GitHub API.
#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Convert any HTTP response into a listing.
///
/// Only the status decides the outcome. The `message` field of an error
/// body is kept for the failure reason.
async fn into_listing(response: Response) -> RepositoryListing {
    let status = response.status();
    if status.is_success() {
        return RepositoryListing {
            status: status.as_u16(),
            message: None,
        };
    }

    let body = response.text().await.unwrap_or_default();
    RepositoryListing {
        status: status.as_u16(),
        message: serde_json::from_str::<GitHubErrorResponse>(&body)
            .map(|err| err.message)
            .ok(),
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    fn name(&self) -> &'static str {
        "github"
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn list_repositories(&self) -> Result<RepositoryListing, ForgeError> {
        self.list("/user/repos").await
    }

    async fn list_repositories_by_installation(&self) -> Result<RepositoryListing, ForgeError> {
        self.list("/installation/repositories").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn no_authorization(request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }

    /// Base URL of a local port with nothing listening on it.
    fn unbound_uri() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    mod construction {
        use super::*;

        #[test]
        fn defaults_to_public_api() {
            let client = GitHubClient::new(Client::new(), None);
            assert_eq!(client.api_base(), "https://api.github.com");

            let client = GitHubClient::new(Client::new(), Some(""));
            assert_eq!(client.api_base(), "https://api.github.com");
        }

        #[test]
        fn custom_api_base_trims_trailing_slash() {
            let client = GitHubClient::new(Client::new(), Some("https://ghe.example.com/api/v3/"));
            assert_eq!(client.api_base(), "https://ghe.example.com/api/v3");
        }

        #[test]
        fn debug_redacts_token() {
            let client = GitHubClient::new(Client::new(), None).with_token("ghp_secret");
            let debug = format!("{:?}", client);
            assert!(!debug.contains("ghp_secret"));
            assert!(debug.contains("has_token: true"));
        }
    }

    mod listing {
        use super::*;

        #[tokio::test]
        async fn user_repos_with_token() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/user/repos"))
                .and(query_param("page", "1"))
                .and(query_param("per_page", "1"))
                .and(header("authorization", "Bearer ghp_valid"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                    { "full_name": "octocat/hello-world", "private": false }
                ])))
                .expect(1)
                .mount(&server)
                .await;

            let client = GitHubClient::new(Client::new(), Some(&server.uri())).with_token("ghp_valid");
            let listing = client.list_repositories().await.unwrap();

            assert!(listing.is_success());
            assert!(listing.message.is_none());
        }

        #[tokio::test]
        async fn anonymous_sends_no_authorization() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/user/repos"))
                .and(no_authorization)
                .respond_with(ResponseTemplate::new(401).set_body_json(
                    serde_json::json!({ "message": "Requires authentication" }),
                ))
                .expect(1)
                .mount(&server)
                .await;

            let client = GitHubClient::new(Client::new(), Some(&server.uri()));
            let listing = client.list_repositories().await.unwrap();

            assert_eq!(listing.status, 401);
            assert_eq!(listing.message.as_deref(), Some("Requires authentication"));
        }

        #[tokio::test]
        async fn installation_repositories() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/installation/repositories"))
                .and(header_exists("x-github-api-version"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "total_count": 3,
                    "repositories": [{ "full_name": "org/private-repo", "private": true }]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let client = GitHubClient::new(Client::new(), Some(&server.uri())).with_token("ghs_x");
            let listing = client.list_repositories_by_installation().await.unwrap();

            assert_eq!(listing.status, 200);
        }

        #[tokio::test]
        async fn server_error_is_returned_as_listing() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
                .mount(&server)
                .await;

            let client = GitHubClient::new(Client::new(), Some(&server.uri()));
            let listing = client.list_repositories().await.unwrap();

            assert_eq!(listing.status, 503);
            assert!(listing.message.is_none());
            assert!(!listing.is_success());
        }

        #[tokio::test]
        async fn unparsable_success_body_is_still_success() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
                .mount(&server)
                .await;

            let client = GitHubClient::new(Client::new(), Some(&server.uri()));
            let listing = client.list_repositories().await.unwrap();

            assert_eq!(listing.status, 200);
            assert!(listing.message.is_none());
        }

        #[tokio::test]
        async fn unreachable_server_is_network_error() {
            let uri = unbound_uri();

            let client = GitHubClient::new(Client::new(), Some(&uri));
            let err = client.list_repositories().await.unwrap_err();
            assert!(matches!(err, ForgeError::NetworkError(_)));
        }
    }
}
