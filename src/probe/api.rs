//! probe::api
//!
//! API-level access probe.
//!
//! A single `page=1, per_page=1` listing is requested. Any status below 300
//! counts as access granted.

use tracing::{error, info};

use super::AccessError;
use crate::forge::{RepositoryClient, RepositoryListing};

/// Server label used for API access failures.
const API_SERVER: &str = "server";

/// Server label used for GitHub App repository access failures.
const GITHUB_SERVER: &str = "Github server";

/// Prove API access: by installation for App credentials, otherwise by
/// listing the identity's repositories.
pub async fn probe_api_access(
    client: &dyn RepositoryClient,
    by_installation: bool,
) -> Result<RepositoryListing, AccessError> {
    info!(api_base = %client.api_base(), by_installation, "probing API access");
    probe(client, by_installation, API_SERVER).await
}

/// Prove repository access granted to a GitHub App installation.
pub async fn probe_installation_access(
    client: &dyn RepositoryClient,
) -> Result<RepositoryListing, AccessError> {
    info!(api_base = %client.api_base(), "validating repository access using Github app based auth");
    probe(client, true, GITHUB_SERVER).await
}

async fn probe(
    client: &dyn RepositoryClient,
    by_installation: bool,
    server: &'static str,
) -> Result<RepositoryListing, AccessError> {
    let listing = if by_installation {
        client.list_repositories_by_installation().await
    } else {
        client.list_repositories().await
    }
    .map_err(|e| {
        error!(error = %e, "failed to authenticate");
        AccessError::from(e)
    })?;

    if !listing.is_success() {
        error!(status = listing.status, "received error response during authentication");
        return Err(AccessError::Rejected {
            server,
            status: listing.status,
            message: listing.message,
        });
    }

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Provider;
    use crate::forge::mock::{MockClientFactory, MockOperation};
    use crate::forge::{ClientFactory, ForgeError};

    async fn client(factory: &MockClientFactory) -> Box<dyn RepositoryClient> {
        factory
            .build_client(&Provider::Github, None)
            .await
            .ok()
            .unwrap()
    }

    #[tokio::test]
    async fn success_below_300() {
        let factory = MockClientFactory::new().with_status(204);
        let listing = probe_api_access(client(&factory).await.as_ref(), false)
            .await
            .unwrap();
        assert_eq!(listing.status, 204);
        assert_eq!(factory.operations()[1], MockOperation::ListRepositories);
    }

    #[tokio::test]
    async fn status_300_is_rejected() {
        let factory = MockClientFactory::new().with_status(300);
        let err = probe_api_access(client(&factory).await.as_ref(), false)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(300));
    }

    #[tokio::test]
    async fn app_access_lists_by_installation() {
        let factory = MockClientFactory::new();
        probe_api_access(client(&factory).await.as_ref(), true)
            .await
            .unwrap();
        assert_eq!(
            factory.operations()[1],
            MockOperation::ListRepositoriesByInstallation
        );
    }

    #[tokio::test]
    async fn installation_rejection_names_github_server() {
        let factory = MockClientFactory::new().with_status(401);
        let err = probe_installation_access(client(&factory).await.as_ref())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Received error response from Github server for authentication, status code: 401"
        );
    }

    #[tokio::test]
    async fn missing_response_is_no_response() {
        let factory =
            MockClientFactory::new().fail_listing(ForgeError::NetworkError("timed out".into()));
        let err = probe_api_access(client(&factory).await.as_ref(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::NoResponse(_)));
        assert_eq!(err.reason(), "timed out");
    }
}
