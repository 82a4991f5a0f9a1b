//! git::remote
//!
//! Remote ref listing using git2.
//!
//! Listing the refs of a remote is the cheapest operation that proves the
//! supplied credentials are accepted by the git transport. No objects are
//! fetched and nothing is written to disk.
//!
//! # Error Handling
//!
//! - [`GitError::InvalidUrl`]: the URL cannot be used as a remote
//! - [`GitError::InvalidKey`]: an in-memory SSH key is not UTF-8 PEM text
//! - [`GitError::Connect`]: connecting or authenticating failed
//! - [`GitError::List`]: the connection succeeded but refs could not be read
//!
//! # Example
//!
//! ```ignore
//! use git_connector::git::{Git2RemoteLister, RemoteCredentials, RemoteLister};
//!
//! let lister = Git2RemoteLister::new(false);
//! let refs = lister.list_refs(
//!     "https://github.com/octocat/Hello-World.git",
//!     &RemoteCredentials::http("octocat", ""),
//! )?;
//! ```

use std::path::PathBuf;

use git2::{CertificateCheckStatus, Cred, CredentialType, Direction, ProxyOptions, RemoteCallbacks};
use thiserror::Error;
use tracing::debug;

/// Errors from remote git operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitError {
    /// The URL cannot be used as a remote.
    #[error("invalid repository URL '{url}': {message}")]
    InvalidUrl {
        /// The URL that was rejected
        url: String,
        /// Description of the problem
        message: String,
    },

    /// In-memory SSH key material is unusable.
    #[error("invalid SSH private key: {0}")]
    InvalidKey(String),

    /// Connecting or authenticating to the remote failed.
    #[error("failed to connect to '{url}': {message}")]
    Connect {
        /// The remote URL
        url: String,
        /// The transport error message
        message: String,
    },

    /// Refs could not be read from an established connection.
    #[error("failed to list remote refs: {0}")]
    List(String),
}

impl GitError {
    /// The underlying cause, without the operation prefix.
    pub fn reason(&self) -> &str {
        match self {
            GitError::InvalidUrl { message, .. } | GitError::Connect { message, .. } => message,
            GitError::InvalidKey(message) | GitError::List(message) => message,
        }
    }
}

/// Credentials presented to the git transport.
#[derive(Clone, PartialEq, Eq)]
pub enum RemoteCredentials {
    /// HTTP basic auth. An empty secret is sent for anonymous access.
    Http { username: String, secret: String },
    /// SSH private key held in memory.
    SshKeyMemory {
        username: String,
        private_key: String,
        passphrase: Option<String>,
    },
    /// SSH private key read from disk by libssh2.
    SshKeyPath {
        username: String,
        path: PathBuf,
        passphrase: Option<String>,
    },
}

impl RemoteCredentials {
    /// HTTP basic auth credentials.
    pub fn http(username: impl Into<String>, secret: impl Into<String>) -> Self {
        RemoteCredentials::Http {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// In-memory SSH key credentials.
    ///
    /// # Errors
    ///
    /// `InvalidKey` if the key bytes are not UTF-8.
    pub fn ssh_key_from_bytes(
        username: impl Into<String>,
        key: &[u8],
        passphrase: &str,
    ) -> Result<Self, GitError> {
        let private_key = String::from_utf8(key.to_vec())
            .map_err(|_| GitError::InvalidKey("key is not valid UTF-8 PEM text".into()))?;
        Ok(RemoteCredentials::SshKeyMemory {
            username: username.into(),
            private_key,
            passphrase: non_empty(passphrase),
        })
    }

    /// SSH key file credentials.
    pub fn ssh_key_path(
        username: impl Into<String>,
        path: impl Into<PathBuf>,
        passphrase: &str,
    ) -> Self {
        RemoteCredentials::SshKeyPath {
            username: username.into(),
            path: path.into(),
            passphrase: non_empty(passphrase),
        }
    }

    /// Short name of the credential kind, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteCredentials::Http { .. } => "http-basic",
            RemoteCredentials::SshKeyMemory { .. } => "ssh-key",
            RemoteCredentials::SshKeyPath { .. } => "ssh-key-path",
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

// Custom Debug to avoid exposing secrets
impl std::fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteCredentials::Http { username, secret } => f
                .debug_struct("Http")
                .field("username", username)
                .field("has_secret", &!secret.is_empty())
                .finish(),
            RemoteCredentials::SshKeyMemory {
                username,
                passphrase,
                ..
            } => f
                .debug_struct("SshKeyMemory")
                .field("username", username)
                .field("has_passphrase", &passphrase.is_some())
                .finish_non_exhaustive(),
            RemoteCredentials::SshKeyPath {
                username,
                path,
                passphrase,
            } => f
                .debug_struct("SshKeyPath")
                .field("username", username)
                .field("path", path)
                .field("has_passphrase", &passphrase.is_some())
                .finish(),
        }
    }
}

/// A ref advertised by a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Full ref name (e.g., `refs/heads/main`)
    pub name: String,
    /// Object id the ref points to
    pub oid: String,
}

/// Lists the refs of a remote repository.
///
/// Implementations block until the listing completes.
pub trait RemoteLister: Send + Sync {
    /// List refs advertised by `url`, authenticating with `credentials`.
    fn list_refs(
        &self,
        url: &str,
        credentials: &RemoteCredentials,
    ) -> Result<Vec<RemoteRef>, GitError>;
}

/// git2-backed [`RemoteLister`].
#[derive(Debug, Clone, Default)]
pub struct Git2RemoteLister {
    skip_tls_verify: bool,
}

impl Git2RemoteLister {
    /// Create a lister. `skip_tls_verify` accepts any HTTPS certificate.
    pub fn new(skip_tls_verify: bool) -> Self {
        Self { skip_tls_verify }
    }
}

impl RemoteLister for Git2RemoteLister {
    fn list_refs(
        &self,
        url: &str,
        credentials: &RemoteCredentials,
    ) -> Result<Vec<RemoteRef>, GitError> {
        let mut remote = git2::Remote::create_detached(url).map_err(|e| GitError::InvalidUrl {
            url: url.to_string(),
            message: e.message().to_string(),
        })?;

        let mut handler = CredentialHandler::new(credentials);
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |url, username, allowed| handler.handle(url, username, allowed));
        if self.skip_tls_verify {
            callbacks.certificate_check(|_, _| Ok(CertificateCheckStatus::CertificateOk));
        }

        let mut proxy = ProxyOptions::new();
        proxy.auto();

        debug!(url = %url, credentials = credentials.kind(), "listing remote refs");
        let connection = remote
            .connect_auth(Direction::Fetch, Some(callbacks), Some(proxy))
            .map_err(|e| GitError::Connect {
                url: url.to_string(),
                message: e.message().to_string(),
            })?;

        let refs = connection
            .list()
            .map_err(|e| GitError::List(e.message().to_string()))?
            .iter()
            .map(|head| RemoteRef {
                name: head.name().to_string(),
                oid: head.oid().to_string(),
            })
            .collect::<Vec<_>>();

        debug!(url = %url, count = refs.len(), "listed remote refs");
        Ok(refs)
    }
}

/// Answers git2 credential callbacks from a fixed credential set.
///
/// Each credential type is offered once. libgit2 re-invokes the callback
/// after a rejection; the second request for the same type fails instead of
/// looping.
struct CredentialHandler<'a> {
    credentials: &'a RemoteCredentials,
    username_attempt: bool,
    ssh_key_attempt: bool,
    plain_user_pass_attempt: bool,
}

impl<'a> CredentialHandler<'a> {
    fn new(credentials: &'a RemoteCredentials) -> Self {
        Self {
            credentials,
            username_attempt: false,
            ssh_key_attempt: false,
            plain_user_pass_attempt: false,
        }
    }

    fn handle(
        &mut self,
        _url: &str,
        _username_from_url: Option<&str>,
        allowed: CredentialType,
    ) -> Result<Cred, git2::Error> {
        match self.credentials {
            RemoteCredentials::Http { username, secret } => {
                if allowed.contains(CredentialType::USER_PASS_PLAINTEXT)
                    && !self.plain_user_pass_attempt
                {
                    self.plain_user_pass_attempt = true;
                    return Cred::userpass_plaintext(username, secret);
                }
            }
            RemoteCredentials::SshKeyMemory {
                username,
                private_key,
                passphrase,
            } => {
                if let Some(cred) = self.ssh_username(username, allowed) {
                    return cred;
                }
                if allowed.contains(CredentialType::SSH_KEY) && !self.ssh_key_attempt {
                    self.ssh_key_attempt = true;
                    return Cred::ssh_key_from_memory(
                        username,
                        None,
                        private_key,
                        passphrase.as_deref(),
                    );
                }
            }
            RemoteCredentials::SshKeyPath {
                username,
                path,
                passphrase,
            } => {
                if let Some(cred) = self.ssh_username(username, allowed) {
                    return cred;
                }
                if allowed.contains(CredentialType::SSH_KEY) && !self.ssh_key_attempt {
                    self.ssh_key_attempt = true;
                    return Cred::ssh_key(username, None, path, passphrase.as_deref());
                }
            }
        }

        Err(git2::Error::from_str(
            "remote rejected the supplied credentials",
        ))
    }

    fn ssh_username(
        &mut self,
        username: &str,
        allowed: CredentialType,
    ) -> Option<Result<Cred, git2::Error>> {
        if allowed.contains(CredentialType::USERNAME) && !self.username_attempt {
            self.username_attempt = true;
            return Some(Cred::username(username));
        }
        None
    }
}
