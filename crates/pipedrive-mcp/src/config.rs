//! Server configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. a TOML file (`--config <path>`, else `./.pipedrive-mcp.toml` when present)
//! 3. `PIPEDRIVE_*` environment variables
//!
//! ```toml
//! [client]
//! api_token = "..."
//! company_domain = "acme"
//! timeout_ms = 30000
//!
//! [features.users]
//! enabled = false
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use pipedrive_client::{ClientConfig, ClientError, ClientResult};

use crate::registry::Feature;

/// Read when no `--config` path is given; absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = ".pipedrive-mcp.toml";

pub const ENV_API_TOKEN: &str = "PIPEDRIVE_API_TOKEN";
pub const ENV_COMPANY_DOMAIN: &str = "PIPEDRIVE_COMPANY_DOMAIN";
pub const ENV_BASE_URL: &str = "PIPEDRIVE_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "PIPEDRIVE_TIMEOUT_MS";

fn default_timeout_ms() -> u64 {
    ClientConfig::DEFAULT_TIMEOUT_MS
}

fn default_enabled() -> bool {
    true
}

/// `[client]` table.
#[derive(Clone, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub company_domain: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            company_domain: None,
            base_url: None,
            timeout_ms: ClientConfig::DEFAULT_TIMEOUT_MS,
        }
    }
}

// Hand-written so the token never reaches logs.
impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("company_domain", &self.company_domain)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// `[features.<name>]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeatureToggle {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureToggle>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn feature_env_var(feature: Feature) -> String {
    format!("PIPEDRIVE_FEATURES_{}_ENABLED", feature.key().to_ascii_uppercase())
}

fn parse_flag(name: &str, raw: &str) -> ClientResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ClientError::config_error(format!(
            "{name} must be a boolean, got '{raw}'"
        ))),
    }
}

fn config_error(e: config::ConfigError) -> ClientError {
    ClientError::config_error(e.to_string())
}

impl McpConfig {
    /// Load from an explicit file (must exist) or the default file (optional),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        debug!(path = %file.display(), required, "Loading configuration");

        let mut builder = Config::builder()
            .add_source(File::from(file).format(FileFormat::Toml).required(required));

        builder = builder
            .set_override_option("client.api_token", env_var(ENV_API_TOKEN))
            .and_then(|b| b.set_override_option("client.company_domain", env_var(ENV_COMPANY_DOMAIN)))
            .and_then(|b| b.set_override_option("client.base_url", env_var(ENV_BASE_URL)))
            .map_err(config_error)?;

        if let Some(raw) = env_var(ENV_TIMEOUT_MS) {
            let timeout: i64 = raw.trim().parse().map_err(|_| {
                ClientError::config_error(format!(
                    "{ENV_TIMEOUT_MS} must be a positive integer, got '{raw}'"
                ))
            })?;
            builder = builder
                .set_override("client.timeout_ms", timeout)
                .map_err(config_error)?;
        }

        for feature in Feature::ALL {
            let name = feature_env_var(feature);
            if let Some(raw) = env_var(&name) {
                let enabled = parse_flag(&name, &raw)?;
                builder = builder
                    .set_override(format!("features.{}.enabled", feature.key()), enabled)
                    .map_err(config_error)?;
            }
        }

        builder
            .build()
            .and_then(|config| config.try_deserialize::<McpConfig>())
            .map_err(config_error)
    }

    /// Connection settings for the HTTP client; token and domain (or base URL) are required.
    pub fn client_config(&self) -> ClientResult<ClientConfig> {
        let settings = &self.client;
        let token = settings.api_token.clone().ok_or_else(|| {
            ClientError::config_error(format!(
                "Pipedrive API token is required (set {ENV_API_TOKEN} or client.api_token)"
            ))
        })?;
        let domain = settings.company_domain.clone().unwrap_or_default();
        if domain.trim().is_empty() && settings.base_url.is_none() {
            return Err(ClientError::config_error(format!(
                "Pipedrive company domain is required (set {ENV_COMPANY_DOMAIN} or client.company_domain)"
            )));
        }

        let mut config = ClientConfig::new(token, domain).with_timeout_ms(settings.timeout_ms);
        if let Some(url) = &settings.base_url {
            config = config.with_base_url(url.clone());
        }
        config.validate()?;
        Ok(config)
    }
}
