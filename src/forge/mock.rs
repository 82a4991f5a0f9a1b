//! forge::mock
//!
//! Mock client factory for deterministic testing.
//!
//! # Design
//!
//! [`MockClientFactory`] hands out [`MockRepositoryClient`]s that share its
//! state. Every build and listing call is recorded so tests can assert how
//! many probes ran and with which credentials.
//!
//! # Example
//!
//! ```
//! use git_connector::forge::mock::{MockClientFactory, MockOperation};
//! use git_connector::forge::ClientFactory;
//! use git_connector::core::types::Provider;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let factory = MockClientFactory::new().with_status(401);
//! let client = factory.build_client(&Provider::Github, None).await.ok().unwrap();
//!
//! let listing = client.list_repositories().await.unwrap();
//! assert_eq!(listing.status, 401);
//! assert_eq!(factory.listing_count(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::errors::ClientError;
use super::traits::{ForgeError, RepositoryClient, RepositoryListing};
use super::ClientFactory;
use crate::core::types::{ApiAccessConfig, Provider};

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    BuildClient {
        provider: String,
        access_type: Option<String>,
        endpoint: Option<String>,
    },
    ListRepositories,
    ListRepositoriesByInstallation,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockInner {
    /// Error returned from `build_client`.
    build_error: Option<ClientError>,
    /// Result returned from every listing call.
    listing: Result<RepositoryListing, ForgeError>,
    /// Recorded operations.
    operations: Vec<MockOperation>,
}

/// Mock factory for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockClientFactory {
    inner: Arc<Mutex<MockInner>>,
}

impl MockClientFactory {
    /// A factory whose clients answer every listing with 200.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                build_error: None,
                listing: Ok(RepositoryListing {
                    status: 200,
                    message: None,
                    }),
                operations: Vec::new(),
            })),
        }
    }

    /// Answer listings with `status`.
    pub fn with_status(self, status: u16) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.listing = Ok(RepositoryListing {
                status,
                message: (status >= 300).then(|| "Bad credentials".to_string()),
            });
        }
        self
    }

    /// Fail listings without a response.
    pub fn fail_listing(self, err: ForgeError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.listing = Err(err);
        }
        self
    }

    /// Fail `build_client` with `err`.
    pub fn fail_build(self, err: ClientError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.build_error = Some(err);
        }
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Number of `build_client` calls.
    pub fn build_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| matches!(op, MockOperation::BuildClient { .. }))
            .count()
    }

    /// Number of listing calls of either kind.
    pub fn listing_count(&self) -> usize {
        self.operations().len() - self.build_count()
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    fn listing(&self) -> Result<RepositoryListing, ForgeError> {
        let inner = self.inner.lock().unwrap();
        inner.listing.clone()
    }
}

impl Default for MockClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientFactory for MockClientFactory {
    async fn build_client(
        &self,
        provider: &Provider,
        api_access: Option<&ApiAccessConfig>,
    ) -> Result<Box<dyn RepositoryClient>, ClientError> {
        self.record(MockOperation::BuildClient {
            provider: provider.to_string(),
            access_type: api_access
                .and_then(|a| a.access_type.as_ref())
                .map(|t| t.to_string()),
            endpoint: api_access.map(|a| a.endpoint.clone()),
        });

        let build_error = self.inner.lock().unwrap().build_error.clone();
        if let Some(err) = build_error {
            return Err(err);
        }

        Ok(Box::new(MockRepositoryClient {
            factory: self.clone(),
        }))
    }
}

/// Client handed out by [`MockClientFactory`].
#[derive(Debug)]
pub struct MockRepositoryClient {
    factory: MockClientFactory,
}

#[async_trait]
impl RepositoryClient for MockRepositoryClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn api_base(&self) -> &str {
        "mock://api"
    }

    async fn list_repositories(&self) -> Result<RepositoryListing, ForgeError> {
        self.factory.record(MockOperation::ListRepositories);
        self.factory.listing()
    }

    async fn list_repositories_by_installation(&self) -> Result<RepositoryListing, ForgeError> {
        self.factory
            .record(MockOperation::ListRepositoriesByInstallation);
        self.factory.listing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ApiAccessType;

    #[tokio::test]
    async fn records_build_and_listing() {
        let factory = MockClientFactory::new();
        let access = ApiAccessConfig {
            access_type: Some(ApiAccessType::Token),
            endpoint: "https://ghe.example.com/api/v3".into(),
            token: "t".into(),
            ..Default::default()
        };

        let client = factory
            .build_client(&Provider::Github, Some(&access))
            .await
            .ok()
            .unwrap();
        client.list_repositories_by_installation().await.unwrap();

        assert_eq!(
            factory.operations(),
            vec![
                MockOperation::BuildClient {
                    provider: "Github".into(),
                    access_type: Some("Token".into()),
                    endpoint: Some("https://ghe.example.com/api/v3".into()),
                },
                MockOperation::ListRepositoriesByInstallation,
            ]
        );
        assert_eq!(factory.build_count(), 1);
        assert_eq!(factory.listing_count(), 1);
    }

    #[tokio::test]
    async fn configured_build_failure() {
        let factory =
            MockClientFactory::new().fail_build(ClientError::UnsupportedProvider("X".into()));
        let result = factory.build_client(&Provider::Github, None).await;
        assert!(matches!(result, Err(ClientError::UnsupportedProvider(_))));
        assert_eq!(factory.listing_count(), 0);
    }

    #[tokio::test]
    async fn configured_listing_failure() {
        let factory =
            MockClientFactory::new().fail_listing(ForgeError::NetworkError("refused".into()));
        let client = factory.build_client(&Provider::Github, None).await.ok().unwrap();
        assert!(client.list_repositories().await.is_err());
    }

    #[tokio::test]
    async fn clients_share_factory_state() {
        let factory = MockClientFactory::new().with_status(403);
        let first = factory.build_client(&Provider::Github, None).await.ok().unwrap();
        let second = factory.build_client(&Provider::Github, None).await.ok().unwrap();

        assert_eq!(first.list_repositories().await.unwrap().status, 403);
        assert_eq!(second.list_repositories().await.unwrap().status, 403);
        assert_eq!(factory.listing_count(), 2);
    }
}
