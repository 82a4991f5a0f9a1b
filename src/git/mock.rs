//! git::mock
//!
//! Recording [`RemoteLister`] for deterministic testing.
//!
//! # Example
//!
//! ```
//! use git_connector::git::mock::MockRemoteLister;
//! use git_connector::git::{RemoteCredentials, RemoteLister};
//!
//! let lister = MockRemoteLister::new();
//! lister
//!     .list_refs("https://example.com/r.git", &RemoteCredentials::http("u", "p"))
//!     .unwrap();
//! assert_eq!(lister.calls().len(), 1);
//! ```

use std::sync::{Arc, Mutex};

use super::remote::{GitError, RemoteCredentials, RemoteLister, RemoteRef};

/// A recorded `list_refs` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub url: String,
    pub credentials: RemoteCredentials,
}

#[derive(Debug)]
struct MockInner {
    result: Result<Vec<RemoteRef>, GitError>,
    calls: Vec<ListCall>,
}

/// Mock lister for testing.
///
/// Clones share state.
#[derive(Debug, Clone)]
pub struct MockRemoteLister {
    inner: Arc<Mutex<MockInner>>,
}

impl MockRemoteLister {
    /// A lister that reports a single `HEAD` ref for every remote.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                result: Ok(vec![RemoteRef {
                    name: "HEAD".into(),
                    oid: "0".repeat(40),
                }]),
                calls: Vec::new(),
            })),
        }
    }

    /// Fail every listing with `err`.
    pub fn fail_with(self, err: GitError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.result = Err(err);
        }
        self
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<ListCall> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }
}

impl Default for MockRemoteLister {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteLister for MockRemoteLister {
    fn list_refs(
        &self,
        url: &str,
        credentials: &RemoteCredentials,
    ) -> Result<Vec<RemoteRef>, GitError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ListCall {
            url: url.to_string(),
            credentials: credentials.clone(),
        });
        inner.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_and_returns_failure() {
        let lister = MockRemoteLister::new().fail_with(GitError::Connect {
            url: "ssh://h/r.git".into(),
            message: "authentication required".into(),
        });
        let creds = RemoteCredentials::ssh_key_path("git", "/k", "");

        let result = lister.list_refs("ssh://h/r.git", &creds);

        assert!(result.is_err());
        assert_eq!(
            lister.calls(),
            vec![ListCall {
                url: "ssh://h/r.git".into(),
                credentials: creds,
            }]
        );
    }
}
