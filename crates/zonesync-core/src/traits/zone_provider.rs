// # Zone Provider Trait
//
// Defines the orchestrator-facing interface of a DNS provider: read a zone
// into canonical records, and apply a plan of changes.
//
// ## Implementations
//
// - Scaleway: `zonesync-provider-scaleway` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::{ZoneProvider, Zone};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* ZoneProvider implementation */;
//
//     let mut desired = Zone::new("unit.tests.")?;
//     // ... fill desired records ...
//
//     let plan = provider.plan(desired).await?;
//     let applied = provider.apply(&plan).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::RecordType;
use crate::zone::{Plan, Zone};

/// Trait for DNS provider implementations
///
/// # Contract
///
/// - `populate` never fails because of a single malformed record; such
///   records are skipped (or kept with empty values in lenient mode)
/// - `plan` and `apply` validate every dynamic record of the desired zone
///   before any network mutation
/// - Providers perform no retries; transport errors propagate as-is apart
///   from documented status remaps
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// Read the provider's records for `zone` and add them to it
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the zone exists on the provider side
    /// - `Ok(false)`: the zone does not exist yet
    /// - `Err(Error)`: the zone could not be read
    async fn populate(&self, zone: &mut Zone, lenient: bool) -> Result<bool, crate::Error>;

    /// Compute the changes turning the provider's zone into `desired`
    async fn plan(&self, desired: Zone) -> Result<Plan, crate::Error>;

    /// Submit `plan` and return the number of applied changes
    async fn apply(&self, plan: &Plan) -> Result<usize, crate::Error>;

    /// Check if this provider supports the given record type
    fn supports(&self, record_type: RecordType) -> bool;

    /// Whether dynamic (steered) records are supported
    fn supports_dynamic(&self) -> bool;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing zone providers from configuration
pub trait ZoneProviderFactory: Send + Sync {
    /// Create a ZoneProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn ZoneProvider>, crate::Error>;
}
