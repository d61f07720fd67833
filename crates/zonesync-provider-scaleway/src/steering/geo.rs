// # Geo mapping engine
//
// Canonical geo rules <-> `geo_ip_config`.
//
// ## Encode
//
// Each non-default rule expands its geo codes into one continents list and
// one countries list; every value of the rule's pool becomes one match with
// those lists. The default rule's single value becomes `default`.
//
// ## Decode
//
// Matches that target the same continents and countries are merged into a
// single pool, in order of first appearance, so N values sent to the same
// place come back as one pool of N values. Pools are named `pool-<n>` and,
// when a default is present, fall back to the trailing default pool.

use std::collections::BTreeSet;
use tracing::warn;
use zonesync_core::dynamic::continent_for_country;
use zonesync_core::{DynamicDescriptor, Error, GeoCode, Pool, PoolValue, Result, Rule};

use crate::wire::{GeoIpConfig, GeoIpMatch};

/// Build the `geo_ip_config` for a validated geo descriptor
pub fn encode(descriptor: &DynamicDescriptor) -> Result<GeoIpConfig> {
    let mut matches = Vec::new();
    let mut default = None;

    for rule in &descriptor.rules {
        let pool = descriptor.pool(&rule.pool).ok_or_else(|| {
            Error::validation(format!("Rule references undefined pool `{}`", rule.pool))
        })?;

        match &rule.geos {
            None => {
                let [value] = pool.values.as_slice() else {
                    return Err(Error::validation(format!(
                        "Default pool `{}` must hold exactly one value",
                        rule.pool
                    )));
                };
                default = Some(value.value.clone());
            }
            Some(geos) => {
                let (continents, countries) = expand_geos(geos)?;
                for value in &pool.values {
                    matches.push(GeoIpMatch {
                        continents: continents.clone(),
                        countries: countries.clone(),
                        data: value.value.clone(),
                    });
                }
            }
        }
    }

    Ok(GeoIpConfig { matches, default })
}

/// Pools may only fall back to the default rule's pool
///
/// `geo_ip_config` has a single `default`, so any other fallback chain
/// cannot be expressed.
pub fn check_fallbacks(descriptor: &DynamicDescriptor) -> Result<()> {
    let default_pool = descriptor.default_rule().map(|rule| rule.pool.as_str());

    for (id, pool) in &descriptor.pools {
        let Some(fallback) = pool.fallback.as_deref() else {
            continue;
        };
        if Some(fallback) != default_pool {
            return Err(Error::validation(match default_pool {
                Some(default_pool) => format!(
                    "Pool `{}` falls back to `{}`, geo pools may only fall back to the default pool `{}`",
                    id, fallback, default_pool
                ),
                None => format!(
                    "Pool `{}` falls back to `{}`, geo pools without a default rule cannot fall back",
                    id, fallback
                ),
            }));
        }
    }
    Ok(())
}

/// Split geo codes into deduplicated continent and country lists
///
/// Codes are processed in sorted order; a country code also records its
/// continent. A whole continent listed next to one of its own countries is
/// rejected, since the wire form cannot tell them apart.
pub fn expand_geos(geos: &[GeoCode]) -> Result<(Vec<String>, Vec<String>)> {
    let mut sorted = geos.to_vec();
    sorted.sort();

    for whole in sorted.iter().filter(|geo| geo.country.is_none()) {
        if let Some(narrower) = sorted
            .iter()
            .find(|geo| geo.country.is_some() && geo.continent == whole.continent)
        {
            return Err(Error::validation(format!(
                "Geo code `{}` overlaps `{}` in the same rule",
                whole, narrower
            )));
        }
    }

    let mut continents: Vec<String> = Vec::new();
    let mut countries: Vec<String> = Vec::new();

    for geo in &sorted {
        if geo.is_province() {
            return Err(Error::validation(format!(
                "Province-level geo code `{}` is not supported",
                geo
            )));
        }
        if !continents.contains(&geo.continent) {
            continents.push(geo.continent.clone());
        }
        if let Some(country) = &geo.country
            && !countries.contains(country)
        {
            countries.push(country.clone());
        }
    }

    Ok((continents, countries))
}

/// Rebuild a canonical descriptor from a `geo_ip_config`
pub fn decode(config: &GeoIpConfig) -> Option<DynamicDescriptor> {
    let mut groups: Vec<(BTreeSet<String>, BTreeSet<String>, Vec<PoolValue>)> = Vec::new();

    for entry in &config.matches {
        let continents: BTreeSet<String> = entry.continents.iter().cloned().collect();
        let countries: BTreeSet<String> = entry.countries.iter().cloned().collect();
        if continents.is_empty() && countries.is_empty() {
            warn!("Skipping geo match without continents or countries: {:?}", entry.data);
            continue;
        }

        let value = PoolValue::new(entry.data.clone());
        match groups
            .iter_mut()
            .find(|(c, k, _)| *c == continents && *k == countries)
        {
            Some((_, _, values)) => values.push(value),
            None => groups.push((continents, countries, vec![value])),
        }
    }

    let default = config.default.as_deref().filter(|d| !d.is_empty());
    if groups.is_empty() && default.is_none() {
        return None;
    }

    let fallback = default.map(|_| DynamicDescriptor::pool_id_for(groups.len()));
    let mut descriptor = DynamicDescriptor::new();

    for (index, (continents, countries, values)) in groups.into_iter().enumerate() {
        let id = DynamicDescriptor::pool_id_for(index);
        let mut pool = Pool::new(values);
        pool.fallback = fallback.clone();
        descriptor = descriptor
            .with_pool(id.clone(), pool)
            .with_rule(Rule::geo(id, geos_for(&continents, &countries)));
    }

    if let (Some(id), Some(value)) = (fallback, default) {
        descriptor = descriptor
            .with_pool(id.clone(), Pool::new(vec![PoolValue::new(value)]))
            .with_rule(Rule::default_rule(id));
    }

    Some(descriptor)
}

/// Geo codes for one match target
///
/// Each country becomes `<continent>-<country>`; continents not covered by
/// any listed country stay whole-continent codes.
fn geos_for(continents: &BTreeSet<String>, countries: &BTreeSet<String>) -> Vec<GeoCode> {
    let mut geos = Vec::new();
    let mut covered = BTreeSet::new();

    for country in countries {
        let continent = continent_for_country(country)
            .map(str::to_string)
            .or_else(|| continents.iter().next().cloned());
        match continent {
            Some(continent) => {
                covered.insert(continent.clone());
                geos.push(GeoCode::country(continent, country.clone()));
            }
            None => warn!("Dropping country {} with unknown continent", country),
        }
    }

    for continent in continents {
        if !covered.contains(continent) {
            geos.push(GeoCode::continent(continent.clone()));
        }
    }

    geos.sort();
    geos
}
