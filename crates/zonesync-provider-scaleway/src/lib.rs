// # Scaleway DNS Provider
//
// Translation layer between canonical zonesync records and the Scaleway
// DNS REST API.
//
// ## Layout
//
// - `wire`: flat record and change-batch shapes of the API
// - `codec`: fixed-grammar `data` strings for non-dynamic types
// - `steering`: geo, weighted and health-serviced traffic steering
// - `batch`: ordered change list for one PATCH request
// - `client` / `transport`: the two API calls over `reqwest`
// - `provider`: the `ZoneProvider` implementation
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Provider MUST fail fast if the token is empty
//
// ## API Reference
//
// - List records: GET `/dns-zones/:zone/records?page_size=1000`
// - Update records: PATCH `/dns-zones/:zone/records`

pub mod batch;
pub mod client;
pub mod codec;
pub mod provider;
pub mod steering;
pub mod transport;
pub mod wire;

pub use client::ScalewayClient;
pub use provider::{PROVIDER_NAME, ScalewayProvider};
pub use transport::ReqwestTransport;
pub use wire::WireRecord;

use zonesync_core::config::ProviderConfig;
use zonesync_core::traits::{ZoneProvider, ZoneProviderFactory};
use zonesync_core::{Error, Result};

/// Factory for creating Scaleway providers
pub struct ScalewayFactory;

impl ZoneProviderFactory for ScalewayFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneProvider>> {
        match config {
            ProviderConfig::Scaleway { api_token, .. } => {
                if api_token.is_empty() {
                    return Err(Error::config("Scaleway API token is required"));
                }
                Ok(Box::new(ScalewayProvider::from_config(config)?))
            }
            _ => Err(Error::config("Invalid config for Scaleway provider")),
        }
    }
}

/// Register the Scaleway provider with a registry
///
/// # Example
///
/// ```rust
/// use zonesync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// zonesync_provider_scaleway::register(&registry);
/// assert!(registry.has_provider("scaleway"));
/// ```
pub fn register(registry: &zonesync_core::ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(ScalewayFactory));
}
