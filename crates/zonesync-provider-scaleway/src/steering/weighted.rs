// # Weighted mapping engine
//
// A weighted record is a single `pool-0` behind one default rule. Values
// and weights map one-to-one onto `weighted_ips`, order preserved.

use zonesync_core::{DynamicDescriptor, Error, Pool, PoolValue, Result, Rule};

use crate::wire::{WeightedConfig, WeightedIp};

/// Build the `weighted_config` from `pool-0`
pub fn encode(descriptor: &DynamicDescriptor) -> Result<WeightedConfig> {
    let id = DynamicDescriptor::pool_id_for(0);
    let pool = descriptor
        .pool(&id)
        .ok_or_else(|| Error::validation(format!("Weighted record has no `{}`", id)))?;

    Ok(WeightedConfig {
        weighted_ips: pool
            .values
            .iter()
            .map(|value| WeightedIp {
                ip: value.value.clone(),
                weight: value.weight,
            })
            .collect(),
    })
}

/// Rebuild the descriptor from a `weighted_config`
pub fn decode(config: &WeightedConfig) -> Option<DynamicDescriptor> {
    if config.weighted_ips.is_empty() {
        return None;
    }

    let id = DynamicDescriptor::pool_id_for(0);
    let values = config
        .weighted_ips
        .iter()
        .map(|entry| PoolValue::new(entry.ip.clone()).with_weight(entry.weight))
        .collect();

    Some(
        DynamicDescriptor::new()
            .with_pool(id.clone(), Pool::new(values))
            .with_rule(Rule::default_rule(id)),
    )
}
