//! forge::traits
//!
//! Repository listing interface for hosting service APIs.
//!
//! # Design
//!
//! The `RepositoryClient` trait is async because listing involves network
//! I/O. A listing call only fails when no HTTP response was received;
//! any response, including 4xx and 5xx, is returned as a
//! [`RepositoryListing`] so the caller can decide what the status means.
//!
//! # Example
//!
//! ```ignore
//! use git_connector::forge::RepositoryClient;
//!
//! async fn can_list(client: &dyn RepositoryClient) -> bool {
//!     match client.list_repositories().await {
//!         Ok(listing) => listing.is_success(),
//!         Err(_) => false,
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from API calls that produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl From<reqwest::Error> for ForgeError {
    fn from(err: reqwest::Error) -> Self {
        ForgeError::NetworkError(err.to_string())
    }
}

/// Result of a single listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryListing {
    /// HTTP status of the response
    pub status: u16,
    /// Server-provided message for non-success responses
    pub message: Option<String>,
}

impl RepositoryListing {
    /// Whether the status is below 300.
    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// Client able to enumerate repositories visible to its credentials.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Provider name (e.g., "github").
    fn name(&self) -> &'static str;

    /// API base URL requests are sent to.
    fn api_base(&self) -> &str;

    /// List the first page of repositories of the authenticated identity.
    ///
    /// # Errors
    ///
    /// `NetworkError` if no response was received.
    async fn list_repositories(&self) -> Result<RepositoryListing, ForgeError>;

    /// List the first page of repositories granted to the authenticated
    /// App installation.
    ///
    /// # Errors
    ///
    /// `NetworkError` if no response was received.
    async fn list_repositories_by_installation(&self) -> Result<RepositoryListing, ForgeError>;
}
