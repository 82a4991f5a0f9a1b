//! forge::transport
//!
//! HTTP client construction shared by API clients and the token exchange.
//!
//! # TLS
//!
//! Certificates are verified against the system roots. An additional PEM
//! bundle may be appended; if it cannot be read or holds no certificates a
//! warning is logged and the system roots are used alone. Verification can
//! be switched off entirely with `skip_verify`.
//!
//! # Proxy
//!
//! An explicit proxy URL applies to all schemes. Without one, reqwest's
//! environment proxy detection (`HTTPS_PROXY`, `NO_PROXY`, ...) is used.

use std::path::{Path, PathBuf};

use reqwest::{Certificate, Client, Proxy};
use tracing::{debug, warn};

use super::errors::ClientError;
use crate::auth::installations::CONNECTOR_USER_AGENT;

/// TLS settings applied to every outbound connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportConfig {
    /// Accept any server certificate
    pub skip_verify: bool,
    /// PEM bundle appended to the system roots
    pub additional_certs_path: Option<PathBuf>,
}

impl TransportConfig {
    /// Build an HTTP client, optionally routed through `proxy_url`.
    ///
    /// # Errors
    ///
    /// `InvalidProxy` if a non-empty `proxy_url` cannot be parsed, and
    /// `Transport` if the client itself cannot be built.
    pub fn build_client(&self, proxy_url: Option<&str>) -> Result<Client, ClientError> {
        let mut builder = Client::builder().user_agent(CONNECTOR_USER_AGENT);

        if self.skip_verify {
            debug!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(path) = &self.additional_certs_path {
            for cert in load_additional_certs(path).unwrap_or_default() {
                builder = builder.add_root_certificate(cert);
            }
        }

        if let Some(url) = proxy_url.map(str::trim).filter(|u| !u.is_empty()) {
            let proxy = Proxy::all(url).map_err(|e| ClientError::InvalidProxy {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            debug!(proxy = %url, "routing API requests through proxy");
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}

/// Read a PEM bundle, returning `None` (after a warning) on any failure.
pub fn load_additional_certs(path: &Path) -> Option<Vec<Certificate>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to read additional certificates, using system roots"
            );
            return None;
        }
    };

    match Certificate::from_pem_bundle(&bytes) {
        Ok(certs) if !certs.is_empty() => {
            debug!(path = %path.display(), count = certs.len(), "loaded additional certificates");
            Some(certs)
        }
        Ok(_) => {
            warn!(
                path = %path.display(),
                "no certificates found in additional bundle, using system roots"
            );
            None
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to parse additional certificates, using system roots"
            );
            None
        }
    }
}
