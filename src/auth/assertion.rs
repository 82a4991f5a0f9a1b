//! auth::assertion
//!
//! Signed JWT assertion that authenticates as a GitHub App.
//!
//! # Claims
//!
//! - `iss`: the App ID
//! - `iat`: 60 seconds before now, to absorb clock drift with the server
//! - `exp`: 5 minutes after `iat`
//!
//! The window is fixed. The assertion is used for a single token exchange
//! and then dropped.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

/// Seconds `iat` is backdated.
pub const CLOCK_DRIFT_SECS: i64 = 60;

/// Assertion lifetime in seconds, measured from `iat`.
pub const ASSERTION_LIFETIME_SECS: i64 = 300;

/// Registered claims for a GitHub App assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
    /// App ID
    pub iss: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

impl AppClaims {
    /// Claims for an assertion created at `now`.
    pub fn issued_at(app_id: &str, now: DateTime<Utc>) -> Self {
        let issued = now - Duration::seconds(CLOCK_DRIFT_SECS);
        let expires = issued + Duration::seconds(ASSERTION_LIFETIME_SECS);
        Self {
            iss: app_id.to_string(),
            iat: issued.timestamp(),
            exp: expires.timestamp(),
        }
    }
}

/// RS256 signer holding a parsed App private key.
pub struct AppSigner {
    key: EncodingKey,
}

impl AppSigner {
    /// Parse a PEM-encoded RSA private key.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidKey`] if no PEM block is present or the block is
    /// not an RSA private key.
    pub fn from_pem(pem: &[u8]) -> Result<Self, AuthError> {
        if !pem.windows(11).any(|w| w == b"-----BEGIN ") {
            return Err(AuthError::InvalidKey("failed to parse PEM block".into()));
        }
        let key = EncodingKey::from_rsa_pem(pem)
            .map_err(|e| AuthError::InvalidKey(format!("failed to parse private key: {}", e)))?;
        Ok(Self { key })
    }

    /// Sign `claims` with RS256.
    ///
    /// Key material that only fails to parse at signing time is still
    /// reported as [`AuthError::InvalidKey`].
    pub fn sign(&self, claims: &AppClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &self.key).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                    AuthError::InvalidKey(format!("failed to parse private key: {}", e))
                }
                _ => AuthError::Signing(format!("failed to sign JWT: {}", e)),
            }
        })
    }
}

impl std::fmt::Debug for AppSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSigner").finish_non_exhaustive()
    }
}
