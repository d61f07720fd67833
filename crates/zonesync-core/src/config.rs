//! Configuration types for zonesync
//!
//! This module defines the provider configuration structures.

use serde::{Deserialize, Serialize};
use std::env;

/// Default Scaleway DNS API endpoint
pub const DEFAULT_SCALEWAY_ENDPOINT: &str = "https://api.scaleway.com/domain/v2beta1";

/// Environment variable holding the Scaleway API token
pub const ENV_SCALEWAY_TOKEN: &str = "ZONESYNC_SCALEWAY_TOKEN";
/// Environment variable toggling zone creation ("true"/"false")
pub const ENV_SCALEWAY_CREATE_ZONE: &str = "ZONESYNC_SCALEWAY_CREATE_ZONE";
/// Environment variable overriding the API endpoint
pub const ENV_SCALEWAY_ENDPOINT: &str = "ZONESYNC_SCALEWAY_ENDPOINT";

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Scaleway DNS provider
    Scaleway {
        /// API secret key, sent as `x-auth-token`
        api_token: String,
        /// Allow applying changes to a zone that does not exist yet
        #[serde(default = "default_create_zone")]
        create_zone: bool,
        /// API endpoint override
        #[serde(default)]
        endpoint: Option<String>,
        /// HTTP timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

// Keeps the API token out of logs
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Scaleway {
                create_zone,
                endpoint,
                timeout_secs,
                ..
            } => f
                .debug_struct("Scaleway")
                .field("api_token", &"<REDACTED>")
                .field("create_zone", create_zone)
                .field("endpoint", endpoint)
                .field("timeout_secs", timeout_secs)
                .finish(),
            ProviderConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// Scaleway configuration with defaults for everything but the token
    pub fn scaleway(api_token: impl Into<String>) -> Self {
        ProviderConfig::Scaleway {
            api_token: api_token.into(),
            create_zone: default_create_zone(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Load a Scaleway configuration from environment variables
    pub fn scaleway_from_env() -> Result<Self, crate::Error> {
        Self::scaleway_from_lookup(|key| env::var(key).ok())
    }

    /// Load a Scaleway configuration through `lookup`, keyed by the
    /// `ZONESYNC_SCALEWAY_*` variable names
    pub fn scaleway_from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, crate::Error> {
        let api_token = lookup(ENV_SCALEWAY_TOKEN)
            .ok_or_else(|| crate::Error::config(format!("{} is required", ENV_SCALEWAY_TOKEN)))?;

        let create_zone = match lookup(ENV_SCALEWAY_CREATE_ZONE) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                crate::Error::config(format!(
                    "{} must be true or false, got '{}'",
                    ENV_SCALEWAY_CREATE_ZONE, raw
                ))
            })?,
            None => default_create_zone(),
        };

        let config = ProviderConfig::Scaleway {
            api_token,
            create_zone,
            endpoint: lookup(ENV_SCALEWAY_ENDPOINT),
            timeout_secs: default_timeout_secs(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Scaleway {
                api_token,
                endpoint,
                timeout_secs,
                ..
            } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Scaleway API token cannot be empty"));
                }
                if let Some(endpoint) = endpoint
                    && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
                {
                    return Err(crate::Error::config(format!(
                        "Scaleway endpoint must be an http(s) URL: {}",
                        endpoint
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("Scaleway timeout must be > 0"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Scaleway { .. } => "scaleway",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn default_create_zone() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}
