//! Connection settings for the Pipedrive REST API.
//!
//! `ClientConfig` carries the API token and company domain and resolves the
//! versioned base URL each request is sent to. The token is held as a
//! [`SecretString`] so it never appears in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ClientError, ClientResult};
use crate::transport::ApiVersion;

/// Resolved connection settings for one Pipedrive company account.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_token: SecretString,
    /// Company subdomain, e.g. `acme` for `acme.pipedrive.com`
    pub company_domain: String,
    /// API root override (proxies, tests). Version segments are appended to it.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Default request timeout (30 seconds).
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

    pub fn new(api_token: impl Into<String>, company_domain: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::from(api_token.into()),
            company_domain: company_domain.into(),
            base_url: None,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub(crate) fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }

    /// Reject settings that can never produce a working client.
    pub fn validate(&self) -> ClientResult<()> {
        if self.api_token.expose_secret().trim().is_empty() {
            return Err(ClientError::config_error("Pipedrive API token is required"));
        }
        if self.base_url.is_none() && self.company_domain.trim().is_empty() {
            return Err(ClientError::config_error(
                "Pipedrive company domain is required",
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::config_error(
                "timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    /// API root without a version segment.
    pub fn api_root(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.pipedrive.com/api", self.company_domain.trim()),
        }
    }

    /// Base URL for one API version, e.g. `https://acme.pipedrive.com/api/v2`.
    pub fn versioned_base_url(&self, version: ApiVersion) -> String {
        format!("{}/{}", self.api_root(), version.as_str())
    }
}
