// # zonesync-core
//
// Provider-agnostic core of the zonesync DNS zone translation layer.
//
// ## Architecture Overview
//
// This library provides the shared model every provider translates to and
// from:
// - **CanonicalRecord**: One record set (name + type) with typed values
// - **DynamicDescriptor**: Pools and ordered rules for traffic steering
// - **Zone / Plan / Change**: Record sets of a zone and the changes to apply
// - **ZoneProvider**: Trait for reading zones and applying plans
// - **Transport**: Trait for the single-request HTTP boundary
// - **ZoneCache**: Explicit per-zone snapshot cache
// - **ProviderRegistry**: Plugin-based registry for providers
//
// ## Design Principles
//
// 1. **Pure translation**: Canonical records are never mutated while encoding
// 2. **Validate before mutate**: Dynamic records are checked before any write
// 3. **Plugin-based**: Providers are registered dynamically
// 4. **No retries**: Transport errors propagate to the caller

pub mod cache;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod record;
pub mod registry;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use cache::ZoneCache;
pub use config::ProviderConfig;
pub use dynamic::{DynamicDescriptor, GeoCode, Pool, PoolValue, PoolValueStatus, Rule};
pub use error::{ApiErrorKind, Error, Result};
pub use record::{CanonicalRecord, HealthCheck, HealthCheckProtocol, RecordType, RecordValue};
pub use registry::ProviderRegistry;
pub use traits::{Transport, ZoneProvider};
pub use zone::{Change, Plan, Zone};
