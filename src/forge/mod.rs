//! forge
//!
//! Provider API clients used to prove API access.
//!
//! # Architecture
//!
//! The [`RepositoryClient`] trait defines the one capability the connector
//! needs from a hosting service: listing repositories visible to a set of
//! credentials. The validator obtains clients through a [`ClientFactory`]
//! rather than constructing provider implementations directly.
//!
//! # Modules
//!
//! - `traits`: `RepositoryClient` and listing types
//! - `factory`: provider selection and credential wiring
//! - `transport`: reqwest client construction (TLS, proxy)
//! - [`github`]: GitHub REST implementation
//! - [`mock`]: recording mock for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use git_connector::forge::{ClientFactory, GitHubClientFactory, TransportConfig};
//!
//! let factory = GitHubClientFactory::new(TransportConfig::default());
//! let client = factory.build_client(&provider, config.api_access.as_ref()).await?;
//! let listing = client.list_repositories().await?;
//! ```

mod errors;
mod factory;
pub mod github;
pub mod mock;
mod traits;
mod transport;

pub use errors::ClientError;
pub use factory::{ClientFactory, ForgeProvider, GitHubClientFactory};
pub use traits::*;
pub use transport::{load_additional_certs, TransportConfig};
