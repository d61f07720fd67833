// # Scaleway zone provider
//
// `ZoneProvider` implementation over `ScalewayClient`.
//
// ## Populate
//
// 1. Flat records come from the zone cache, or from one GET that fills it
// 2. Records are grouped by (name, type) in order of first appearance
// 3. Each group decodes through the simple-type codec; the first record
//    carrying a steering extension decodes the dynamic descriptor
// 4. Groups whose values all fail to decode are dropped, or kept with no
//    values in lenient mode
//
// ## Apply
//
// Every record of the desired zone is encoded once as a pre-flight check,
// then the whole plan goes out as a single PATCH. The zone's cache entry is
// dropped after a successful submission.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use zonesync_core::config::DEFAULT_SCALEWAY_ENDPOINT;
use zonesync_core::traits::{Transport, ZoneProvider};
use zonesync_core::{
    CanonicalRecord, Error, Plan, ProviderConfig, RecordType, Result, Zone, ZoneCache,
};

use crate::batch;
use crate::client::ScalewayClient;
use crate::codec;
use crate::steering;
use crate::transport::{DEFAULT_HTTP_TIMEOUT, ReqwestTransport};
use crate::wire::WireRecord;

/// Name the provider registers under
pub const PROVIDER_NAME: &str = "scaleway";

#[derive(Debug, Clone)]
pub struct ScalewayProvider {
    client: ScalewayClient,
    cache: ZoneCache<WireRecord>,
}

impl ScalewayProvider {
    /// Create a provider against the public API endpoint
    pub fn new(api_token: impl Into<String>, create_zone: bool) -> Result<Self> {
        let transport =
            ReqwestTransport::new(DEFAULT_SCALEWAY_ENDPOINT, api_token, DEFAULT_HTTP_TIMEOUT)?;
        Ok(Self::with_transport(Arc::new(transport), create_zone))
    }

    /// Create a provider from a validated configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Scaleway {
                api_token,
                create_zone,
                endpoint,
                timeout_secs,
            } => {
                let endpoint = endpoint.as_deref().unwrap_or(DEFAULT_SCALEWAY_ENDPOINT);
                let transport = ReqwestTransport::new(
                    endpoint,
                    api_token.clone(),
                    Duration::from_secs(*timeout_secs),
                )?;
                debug!(
                    "Scaleway provider: endpoint={}, create_zone={}",
                    endpoint, create_zone
                );
                Ok(Self::with_transport(Arc::new(transport), *create_zone))
            }
            _ => Err(Error::config("Invalid config for Scaleway provider")),
        }
    }

    /// Create a provider over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>, create_zone: bool) -> Self {
        Self {
            client: ScalewayClient::new(transport, create_zone),
            cache: ZoneCache::new(),
        }
    }

    pub fn cache(&self) -> &ZoneCache<WireRecord> {
        &self.cache
    }

    /// Check every record of `zone` can be published
    ///
    /// Runs the steering classification and the value encoders without
    /// touching the network.
    pub fn validate_zone(&self, zone: &Zone) -> Result<()> {
        for record in &zone.records {
            batch::encode_record(record, &zone.name)?;
        }
        Ok(())
    }

    /// Flat records of `zone`, from the cache when possible
    async fn flat_records(&self, zone: &Zone) -> Result<Option<Vec<WireRecord>>> {
        if let Some(records) = self.cache.get(&zone.name).await {
            debug!("Zone {} served from cache ({} records)", zone.name, records.len());
            return Ok(Some(records));
        }

        debug!("Zone {} not cached, fetching", zone.name);
        let records = self.client.zone_records(zone.api_name()).await?;
        if let Some(records) = &records {
            self.cache.insert(&zone.name, records.clone()).await;
        }
        Ok(records)
    }

    /// Turn one (name, type) group of flat records into a canonical record
    fn decode_group(
        &self,
        zone: &Zone,
        name: &str,
        record_type: RecordType,
        records: &[WireRecord],
        lenient: bool,
    ) -> Option<CanonicalRecord> {
        let ttl = records.first().map(|r| r.ttl)?;
        let mut record = CanonicalRecord::new(name, record_type, ttl)
            .with_values(codec::decode(record_type, records));

        if record.values.is_empty() && !lenient {
            warn!(
                "Skipping {} {}: no decodable values",
                record.fqdn(&zone.name),
                record_type
            );
            return None;
        }

        if record_type.supports_dynamic()
            && let Some(wire) = records.iter().find(|r| r.has_steering())
            && let Some(decoded) = steering::decode(wire, &record.fqdn(&zone.name))
        {
            record.dynamic = Some(decoded.descriptor);
            record.healthcheck = decoded.healthcheck;
        }
        Some(record)
    }
}

#[async_trait]
impl ZoneProvider for ScalewayProvider {
    async fn populate(&self, zone: &mut Zone, lenient: bool) -> Result<bool> {
        debug!("populate: zone={}, lenient={}", zone.name, lenient);

        let Some(flat) = self.flat_records(zone).await? else {
            info!("populate: zone {} does not exist", zone.name);
            return Ok(false);
        };

        let mut order: Vec<(String, RecordType)> = Vec::new();
        let mut groups: HashMap<(String, RecordType), Vec<WireRecord>> = HashMap::new();
        for wire in flat {
            let record_type = match wire.record_type.parse::<RecordType>() {
                Ok(record_type) => record_type,
                Err(_) => {
                    debug!("Ignoring unsupported record type {}", wire.record_type);
                    continue;
                }
            };
            let key = (batch::canonical_name(&wire.name).to_string(), record_type);
            if !groups.contains_key(&key) {
                order.push(key.clone());
            }
            groups.entry(key).or_default().push(wire);
        }

        let before = zone.len();
        for key in order {
            let records = groups.remove(&key).unwrap_or_default();
            let (name, record_type) = key;
            if let Some(record) = self.decode_group(zone, &name, record_type, &records, lenient) {
                zone.add_record(record)?;
            }
        }

        info!(
            "populate: found {} records in zone {} (exists=true)",
            zone.len() - before,
            zone.name
        );
        Ok(true)
    }

    async fn plan(&self, desired: Zone) -> Result<Plan> {
        self.validate_zone(&desired)?;

        let mut existing = Zone::new(desired.name.clone())?;
        let exists = self.populate(&mut existing, true).await?;
        let plan = Plan::compute(&existing, desired, exists);

        debug!(
            "plan: {} changes for zone {} (exists={})",
            plan.changes.len(),
            plan.desired.name,
            exists
        );
        Ok(plan)
    }

    async fn apply(&self, plan: &Plan) -> Result<usize> {
        let zone = &plan.desired;
        debug!("apply: zone={}, changes={}", zone.name, plan.changes.len());
        self.validate_zone(zone)?;

        if plan.is_empty() {
            debug!("apply: nothing to do for zone {}", zone.name);
            return Ok(0);
        }

        let changes = batch::assemble(&plan.changes, &zone.name)?;
        info!(
            "apply: submitting {} changes for zone {}",
            plan.changes.len(),
            zone.name
        );
        self.client.record_updates(zone.api_name(), changes).await?;

        if self.cache.invalidate(&zone.name).await {
            debug!("Dropped cached records of zone {}", zone.name);
        }
        info!("apply: zone {} updated", zone.name);
        Ok(plan.changes.len())
    }

    fn supports(&self, record_type: RecordType) -> bool {
        RecordType::ALL.contains(&record_type)
    }

    fn supports_dynamic(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
