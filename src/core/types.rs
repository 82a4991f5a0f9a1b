//! core::types
//!
//! Wire types for connector requests.
//!
//! # Types
//!
//! - [`RequestData`] - Top-level request envelope
//! - [`ConnectorConfig`] - Repository plus the auth configuration to validate
//! - [`HttpAuthConfig`], [`SshAuthConfig`], [`ApiAccessConfig`] - One per auth dimension
//! - [`GithubAppConfig`] - GitHub App credentials shared by HTTP and API access
//!
//! # Enumerations
//!
//! Every enumerated field accepts any string. Known values map to variants,
//! anything else is kept as `Unsupported(value)` so validation can name the
//! offending value instead of failing JSON decoding. Empty or absent values
//! decode to `None` and are reported as missing.
//!
//! # Secrets
//!
//! Byte fields (`ssh_key`, `private_key`) arrive base64-encoded. None of the
//! config types implement `Serialize`, and their `Debug` output redacts every
//! secret.
//!
//! # Example
//!
//! ```
//! use git_connector::core::types::{AuthType, HttpAuthMethod, RequestData};
//!
//! let request: RequestData = serde_json::from_str(r#"{
//!     "connector_type": "Github",
//!     "connector_operation": "validate",
//!     "connector_params": {
//!         "auth_type": "Http",
//!         "repo": "https://github.com/octocat/hello-world.git",
//!         "http_auth": { "auth_method": "Anonymous" }
//!     }
//! }"#).unwrap();
//!
//! let params = request.params.unwrap();
//! assert_eq!(params.auth_type, Some(AuthType::Http));
//! assert_eq!(params.http_auth.unwrap().auth_method, Some(HttpAuthMethod::Anonymous));
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Declares a string-backed wire enum with an `Unsupported` catch-all.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
        #[serde(from = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A value this connector does not recognize.
            Unsupported(String),
        }

        impl $name {
            /// Canonical wire representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Unsupported(value) => value,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $( $wire $(| $alias)* => $name::$variant, )+
                    _ => $name::Unsupported(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Provider named by `connector_type`.
    pub enum Provider {
        /// GitHub or GitHub Enterprise.
        Github => "Github",
    }
}

wire_enum! {
    /// Repository access channel.
    pub enum AuthType {
        /// Git over HTTP(S).
        Http => "Http",
        /// Git over SSH.
        Ssh => "Ssh",
    }
}

wire_enum! {
    /// Credential style for HTTP repository access.
    pub enum HttpAuthMethod {
        /// Username + password.
        Password => "UsernamePassword" | "Password",
        /// Username + personal access token.
        Token => "UsernameToken" | "Token",
        /// No credentials.
        Anonymous => "Anonymous",
        /// GitHub App installation.
        GithubApp => "GithubApp",
    }
}

wire_enum! {
    /// SSH authentication mechanism.
    pub enum SshAuthMechanism {
        /// Public key authentication.
        SshKey => "SSH_KEY",
        /// Kerberos (declared, not implemented).
        Kerberos => "KERBEROS",
    }
}

wire_enum! {
    /// How the SSH secret is supplied.
    pub enum SshKeyMethod {
        /// Password authentication.
        Password => "Password",
        /// Private key bytes supplied inline.
        KeyReference => "KeyReference",
        /// Private key read from a path on this host.
        KeyPath => "KeyPath",
    }
}

wire_enum! {
    /// Credential style for provider API access.
    pub enum ApiAccessType {
        /// Static personal access token.
        Token => "Token",
        /// GitHub App installation token.
        GithubApp => "GithubApp",
    }
}

impl Provider {
    /// Value used when the request omits `connector_type`.
    fn unspecified() -> Self {
        Provider::Unsupported(String::new())
    }
}

/// Top-level request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestData {
    /// Provider hosting the repository.
    #[serde(rename = "connector_type", default = "Provider::unspecified")]
    pub provider: Provider,

    /// Requested operation (only `validate` is dispatched).
    #[serde(rename = "connector_operation", default)]
    pub operation: String,

    /// Connector configuration.
    #[serde(rename = "connector_params", default)]
    pub params: Option<ConnectorConfig>,
}

/// Connector configuration: the repository and how to reach it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorConfig {
    /// Selects which of `http_auth` / `ssh_auth` applies.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub auth_type: Option<AuthType>,

    /// Repository URL.
    #[serde(default)]
    pub repo: String,

    /// HTTP credentials (used when `auth_type` is `Http`).
    #[serde(default)]
    pub http_auth: Option<HttpAuthConfig>,

    /// SSH credentials (used when `auth_type` is `Ssh`).
    #[serde(default)]
    pub ssh_auth: Option<SshAuthConfig>,

    /// Optional provider API credentials, validated independently.
    #[serde(default)]
    pub api_access: Option<ApiAccessConfig>,
}

/// HTTP repository credentials.
#[derive(Clone, Default, Deserialize)]
pub struct HttpAuthConfig {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub auth_method: Option<HttpAuthMethod>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "github_app_auth", default)]
    pub github_app: Option<GithubAppConfig>,
}

/// GitHub App credentials.
///
/// Consumed by the installation token exchange and never persisted.
#[derive(Clone, Default, Deserialize)]
pub struct GithubAppConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_installation_id: String,
    /// PEM-encoded RSA private key.
    #[serde(default, deserialize_with = "base64_bytes")]
    pub private_key: Vec<u8>,
    /// Web URL of the GitHub instance; empty means github.com.
    #[serde(default)]
    pub github_url: String,
}

/// SSH repository credentials.
#[derive(Clone, Default, Deserialize)]
pub struct SshAuthConfig {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub auth_mechanism: Option<SshAuthMechanism>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub ssh_key_auth_method: Option<SshKeyMethod>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub kerberos_auth_method: Option<SshKeyMethod>,
    #[serde(default)]
    pub username: String,
    /// Private key bytes for [`SshKeyMethod::KeyReference`].
    #[serde(default, deserialize_with = "base64_bytes")]
    pub ssh_key: Vec<u8>,
    /// Private key location for [`SshKeyMethod::KeyPath`].
    #[serde(default)]
    pub ssh_key_path: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub passphrase: String,
}

/// Provider API credentials.
#[derive(Clone, Default, Deserialize)]
pub struct ApiAccessConfig {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub access_type: Option<ApiAccessType>,
    /// API base URL; empty means the provider's public API.
    #[serde(default)]
    pub endpoint: String,
    /// Upstream proxy for API calls; empty means the environment's settings.
    #[serde(default)]
    pub proxy_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub github_app: Option<GithubAppConfig>,
}

impl ApiAccessConfig {
    /// API access backed by a GitHub App installation.
    pub fn github_app(app: GithubAppConfig, endpoint: impl Into<String>) -> Self {
        Self {
            access_type: Some(ApiAccessType::GithubApp),
            endpoint: endpoint.into(),
            github_app: Some(app),
            ..Self::default()
        }
    }

    /// Whether this access lists repositories by installation.
    pub fn is_github_app(&self) -> bool {
        self.access_type == Some(ApiAccessType::GithubApp)
    }
}

// --------------------------------------------------------------------------
// Redacting Debug
// --------------------------------------------------------------------------

fn redact(secret: &[u8]) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for HttpAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAuthConfig")
            .field("auth_method", &self.auth_method)
            .field("username", &self.username)
            .field("token", &redact(self.token.as_bytes()))
            .field("password", &redact(self.password.as_bytes()))
            .field("github_app", &self.github_app)
            .finish()
    }
}

impl fmt::Debug for GithubAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubAppConfig")
            .field("app_id", &self.app_id)
            .field("app_installation_id", &self.app_installation_id)
            .field("private_key", &redact(&self.private_key))
            .field("github_url", &self.github_url)
            .finish()
    }
}

impl fmt::Debug for SshAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshAuthConfig")
            .field("auth_mechanism", &self.auth_mechanism)
            .field("ssh_key_auth_method", &self.ssh_key_auth_method)
            .field("kerberos_auth_method", &self.kerberos_auth_method)
            .field("username", &self.username)
            .field("ssh_key", &redact(&self.ssh_key))
            .field("ssh_key_path", &self.ssh_key_path)
            .field("password", &redact(self.password.as_bytes()))
            .field("passphrase", &redact(self.passphrase.as_bytes()))
            .finish()
    }
}

impl fmt::Debug for ApiAccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiAccessConfig")
            .field("access_type", &self.access_type)
            .field("endpoint", &self.endpoint)
            .field("proxy_url", &self.proxy_url)
            .field("token", &redact(self.token.as_bytes()))
            .field("github_app", &self.github_app)
            .finish()
    }
}

// --------------------------------------------------------------------------
// Serde helpers
// --------------------------------------------------------------------------

/// Decode an enumerated field, treating `null` and `""` as absent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()).map(T::from))
}

/// Decode a standard-base64 byte field; `null` decodes to no bytes.
fn base64_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(encoded) => STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom),
        None => Ok(Vec::new()),
    }
}
