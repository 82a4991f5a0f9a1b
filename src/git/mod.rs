//! git
//!
//! Remote repository access over the git transport.
//!
//! # Architecture
//!
//! This module is the only place that imports `git2`. The validator talks
//! to it through the [`RemoteLister`] trait so tests can substitute
//! [`mock::MockRemoteLister`].
//!
//! # Responsibilities
//!
//! - Connecting to a remote over HTTP(S) or SSH without a local repository
//! - Answering credential callbacks from request-supplied secrets
//! - Listing advertised refs
//!
//! # Invariants
//!
//! - Nothing is fetched or written to disk
//! - Each credential type is offered to the remote at most once
//! - Secrets never appear in `Debug` output or errors
//!
//! # Example
//!
//! ```ignore
//! use git_connector::git::{Git2RemoteLister, RemoteCredentials, RemoteLister};
//!
//! let lister = Git2RemoteLister::new(false);
//! let refs = lister.list_refs(url, &RemoteCredentials::http(user, token))?;
//! ```

pub mod mock;
mod remote;

pub use remote::{Git2RemoteLister, GitError, RemoteCredentials, RemoteLister, RemoteRef};
