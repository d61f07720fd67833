// # Traffic steering
//
// Classification, validation and dispatch for dynamic records.
//
// ## Classification
//
// One pass over a dynamic record, before anything is encoded:
//
// 1. Structural checks: pools referenced by rules exist, the default rule
//    is last, pools are named `pool-<n>` in rule order
// 2. Signals: `have_weight` (any value with weight != 1),
//    `have_http_service` (a health check is attached), `have_geo` (any rule
//    with geos)
// 3. More than one signal is a "mix" error, none is a "no dynamic type"
//    error; otherwise the single signal picks the engine
// 4. Engine-specific shape checks
//
// Every error is a `Validation` error prefixed with the record's fqdn and
// type.

pub mod geo;
pub mod service;
pub mod weighted;

use tracing::warn;
use zonesync_core::{
    CanonicalRecord, DynamicDescriptor, Error, HealthCheck, PoolValueStatus, Result,
};

use crate::wire::{GeoIpConfig, HttpServiceConfig, WeightedConfig, WireRecord};

pub const MIX_ERROR: &str = "Cannot mix dynamic record types (geo, weight and service)";
pub const NO_TYPE_ERROR: &str = "No dynamic type record found";
pub const GEO_STATUS_ERROR: &str = "Only accept geos, not weight or status";

/// The steering engine a dynamic record maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringKind {
    Geo,
    Weighted,
    HttpService,
}

/// Encoded steering extension, ready to attach to wire records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SteeringConfig {
    Geo(GeoIpConfig),
    Weighted(WeightedConfig),
    HttpService(HttpServiceConfig),
}

impl SteeringConfig {
    /// Copy of `record` carrying this extension
    pub fn attach(&self, record: WireRecord) -> WireRecord {
        match self {
            SteeringConfig::Geo(config) => WireRecord {
                geo_ip_config: Some(config.clone()),
                ..record
            },
            SteeringConfig::Weighted(config) => WireRecord {
                weighted_config: Some(config.clone()),
                ..record
            },
            SteeringConfig::HttpService(config) => WireRecord {
                http_service_config: Some(config.clone()),
                ..record
            },
        }
    }
}

/// Evidence of each steering kind found on one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub have_weight: bool,
    pub have_http_service: bool,
    pub have_geo: bool,
}

impl Signals {
    pub fn of(descriptor: &DynamicDescriptor, healthcheck: Option<&HealthCheck>) -> Self {
        Self {
            have_weight: descriptor.values().any(|value| value.weight != 1),
            have_http_service: healthcheck.is_some(),
            have_geo: descriptor.rules.iter().any(|rule| rule.geos.is_some()),
        }
    }

    pub fn count(&self) -> usize {
        [self.have_weight, self.have_http_service, self.have_geo]
            .iter()
            .filter(|s| **s)
            .count()
    }

    /// The single steering kind, or the matching validation message
    pub fn kind(&self) -> std::result::Result<SteeringKind, &'static str> {
        match (self.count(), self) {
            (0, _) => Err(NO_TYPE_ERROR),
            (1, s) if s.have_geo => Ok(SteeringKind::Geo),
            (1, s) if s.have_weight => Ok(SteeringKind::Weighted),
            (1, _) => Ok(SteeringKind::HttpService),
            _ => Err(MIX_ERROR),
        }
    }
}

/// Classify `record`, rejecting anything the engines cannot express
///
/// Returns `Ok(None)` for records without a dynamic descriptor.
pub fn classify(record: &CanonicalRecord, zone_name: &str) -> Result<Option<SteeringKind>> {
    let Some(descriptor) = &record.dynamic else {
        return Ok(None);
    };

    let fail = |message: String| {
        Error::validation(format!(
            "{} {}: {}",
            record.fqdn(zone_name),
            record.record_type,
            message
        ))
    };
    let reword = |err: Error| match err {
        Error::Validation(message) => fail(message),
        other => other,
    };

    if !record.record_type.supports_dynamic() {
        return Err(fail(format!(
            "Dynamic records are not supported for {}",
            record.record_type
        )));
    }
    if record.values.is_empty() {
        return Err(fail("Dynamic records require at least one value".to_string()));
    }

    descriptor.check_pool_references().map_err(reword)?;
    descriptor.check_default_rule_last().map_err(reword)?;
    descriptor.check_pool_contiguity().map_err(reword)?;

    let signals = Signals::of(descriptor, record.healthcheck.as_ref());
    let kind = signals.kind().map_err(|message| fail(message.to_string()))?;

    match kind {
        SteeringKind::Geo => {
            geo::check_fallbacks(descriptor).map_err(reword)?;
            for rule in &descriptor.rules {
                if let Some(geos) = &rule.geos {
                    geo::expand_geos(geos).map_err(reword)?;
                }
                let backed_by_other_status = descriptor
                    .pool(&rule.pool)
                    .is_some_and(|pool| pool.values.iter().any(|v| v.status != PoolValueStatus::Obey));
                if backed_by_other_status {
                    return Err(fail(GEO_STATUS_ERROR.to_string()));
                }
            }
            if let Some(rule) = descriptor.default_rule()
                && descriptor.pool(&rule.pool).is_some_and(|pool| pool.values.len() != 1)
            {
                return Err(fail(format!(
                    "Default pool `{}` must hold exactly one value",
                    rule.pool
                )));
            }
        }
        SteeringKind::Weighted | SteeringKind::HttpService => {
            let single_default = descriptor.rule_count() == 1 && descriptor.rules[0].is_default();
            if !single_default {
                return Err(fail(format!(
                    "{:?} records support a single default rule",
                    kind
                )));
            }
            if let (SteeringKind::HttpService, Some(check)) = (kind, &record.healthcheck) {
                service::monitoring_url(check, &record.fqdn(zone_name)).map_err(reword)?;
            }
        }
    }

    Ok(Some(kind))
}

/// Classify and encode the steering extension of `record`
pub fn encode(record: &CanonicalRecord, zone_name: &str) -> Result<Option<SteeringConfig>> {
    let (Some(kind), Some(descriptor)) = (classify(record, zone_name)?, &record.dynamic) else {
        return Ok(None);
    };

    let config = match (kind, &record.healthcheck) {
        (SteeringKind::Geo, _) => SteeringConfig::Geo(geo::encode(descriptor)?),
        (SteeringKind::Weighted, _) => SteeringConfig::Weighted(weighted::encode(descriptor)?),
        (SteeringKind::HttpService, Some(check)) => SteeringConfig::HttpService(
            service::encode(descriptor, check, &record.fqdn(zone_name))?,
        ),
        (SteeringKind::HttpService, None) => return Err(Error::validation(NO_TYPE_ERROR)),
    };

    Ok(Some(config))
}

/// Steering decoded from a wire record
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSteering {
    pub descriptor: DynamicDescriptor,
    pub healthcheck: Option<HealthCheck>,
}

/// Decode the steering extension carried by `record`, if any
///
/// A record carrying several extensions is decoded from the first of geo,
/// weighted, http service.
pub fn decode(record: &WireRecord, fqdn: &str) -> Option<DecodedSteering> {
    let present = [
        record.geo_ip_config.is_some(),
        record.weighted_config.is_some(),
        record.http_service_config.is_some(),
    ];
    if present.iter().filter(|p| **p).count() > 1 {
        warn!("Record {} {} carries several steering configs", fqdn, record.record_type);
    }

    if let Some(config) = &record.geo_ip_config {
        return geo::decode(config).map(|descriptor| DecodedSteering {
            descriptor,
            healthcheck: None,
        });
    }
    if let Some(config) = &record.weighted_config {
        return weighted::decode(config).map(|descriptor| DecodedSteering {
            descriptor,
            healthcheck: None,
        });
    }
    if let Some(config) = &record.http_service_config {
        return service::decode(config, fqdn).map(|(descriptor, check)| DecodedSteering {
            descriptor,
            healthcheck: Some(check),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonesync_core::{GeoCode, Pool, PoolValue, RecordType, Rule};

    const ZONE: &str = "unit.tests.";

    fn geos(codes: &[&str]) -> Vec<GeoCode> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    fn record(descriptor: DynamicDescriptor) -> CanonicalRecord {
        CanonicalRecord::new("www", RecordType::A, 300)
            .with_text_values(["9.9.9.9"])
            .with_dynamic(descriptor)
    }

    fn geo_descriptor() -> DynamicDescriptor {
        DynamicDescriptor::new()
            .with_pool("pool-0", Pool::new(vec![PoolValue::new("1.1.1.1")]).with_fallback("pool-1"))
            .with_pool("pool-1", Pool::new(vec![PoolValue::new("2.2.2.2")]))
            .with_rule(Rule::geo("pool-0", geos(&["EU"])))
            .with_rule(Rule::default_rule("pool-1"))
    }

    fn weighted_descriptor() -> DynamicDescriptor {
        DynamicDescriptor::new()
            .with_pool(
                "pool-0",
                Pool::new(vec![
                    PoolValue::new("1.1.1.1").with_weight(5),
                    PoolValue::new("2.2.2.2"),
                ]),
            )
            .with_rule(Rule::default_rule("pool-0"))
    }

    fn plain_descriptor() -> DynamicDescriptor {
        DynamicDescriptor::new()
            .with_pool("pool-0", Pool::new(vec![PoolValue::new("1.1.1.1")]))
            .with_rule(Rule::default_rule("pool-0"))
    }

    fn message(result: Result<Option<SteeringKind>>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_static_record_is_not_classified() {
        let plain = CanonicalRecord::new("www", RecordType::A, 300).with_text_values(["1.1.1.1"]);
        assert_eq!(classify(&plain, ZONE).unwrap(), None);
        assert_eq!(encode(&plain, ZONE).unwrap(), None);
    }

    #[test]
    fn test_each_kind() {
        assert_eq!(
            classify(&record(geo_descriptor()), ZONE).unwrap(),
            Some(SteeringKind::Geo)
        );
        assert_eq!(
            classify(&record(weighted_descriptor()), ZONE).unwrap(),
            Some(SteeringKind::Weighted)
        );
        let serviced = record(plain_descriptor()).with_healthcheck(HealthCheck::default());
        assert_eq!(
            classify(&serviced, ZONE).unwrap(),
            Some(SteeringKind::HttpService)
        );
    }

    #[test]
    fn test_weight_and_geo_is_a_mix() {
        let mut descriptor = geo_descriptor();
        descriptor.pools.get_mut("pool-0").unwrap().values[0].weight = 3;

        let err = message(classify(&record(descriptor), ZONE));
        assert!(err.contains(MIX_ERROR));
        assert!(err.contains("www.unit.tests. A"));
    }

    #[test]
    fn test_service_and_weight_is_a_mix() {
        let serviced = record(weighted_descriptor()).with_healthcheck(HealthCheck::default());
        assert!(message(classify(&serviced, ZONE)).contains(MIX_ERROR));
    }

    #[test]
    fn test_no_signal() {
        assert!(message(classify(&record(plain_descriptor()), ZONE)).contains(NO_TYPE_ERROR));
    }

    #[test]
    fn test_geo_rejects_status() {
        let descriptor = geo_descriptor().with_pool(
            "pool-0",
            Pool::new(vec![PoolValue::new("1.1.1.1").with_status(PoolValueStatus::Down)])
                .with_fallback("pool-1"),
        );
        assert!(message(classify(&record(descriptor), ZONE)).contains(GEO_STATUS_ERROR));
    }

    #[test]
    fn test_geo_rejects_province() {
        let mut descriptor = geo_descriptor();
        descriptor.rules[0].geos = Some(geos(&["NA-US-CA"]));
        assert!(message(classify(&record(descriptor), ZONE)).contains("NA-US-CA"));
    }

    #[test]
    fn test_geo_rejects_fallback_chain() {
        let descriptor = DynamicDescriptor::new()
            .with_pool("pool-0", Pool::new(vec![PoolValue::new("1.1.1.1")]).with_fallback("pool-1"))
            .with_pool("pool-1", Pool::new(vec![PoolValue::new("2.2.2.2")]).with_fallback("pool-2"))
            .with_pool("pool-2", Pool::new(vec![PoolValue::new("3.3.3.3")]))
            .with_rule(Rule::geo("pool-0", geos(&["EU"])))
            .with_rule(Rule::geo("pool-1", geos(&["NA"])))
            .with_rule(Rule::default_rule("pool-2"));

        let err = message(classify(&record(descriptor), ZONE));
        assert!(err.starts_with("Validation error: www.unit.tests. A: "));
        assert!(err.contains("only fall back to the default pool `pool-2`"));
    }

    #[test]
    fn test_geo_rejects_continent_with_own_country() {
        let mut descriptor = geo_descriptor();
        descriptor.rules[0].geos = Some(geos(&["EU", "EU-FR"]));

        let err = message(classify(&record(descriptor), ZONE));
        assert!(err.contains("`EU` overlaps `EU-FR`"));
    }

    #[test]
    fn test_zero_weight_is_rejected_before_classification() {
        let mut descriptor = weighted_descriptor();
        descriptor.pools.get_mut("pool-0").unwrap().values[0].weight = 0;

        let err = encode(&record(descriptor), ZONE).unwrap_err().to_string();
        assert!(err.contains("www.unit.tests. A: "));
        assert!(err.contains("has weight 0"));
    }

    #[test]
    fn test_pool_naming_is_enforced() {
        let descriptor = DynamicDescriptor::new()
            .with_pool("eu", Pool::new(vec![PoolValue::new("1.1.1.1")]))
            .with_rule(Rule::geo("eu", geos(&["EU"])));

        let err = message(classify(&record(descriptor), ZONE));
        assert!(err.contains("`eu`"));
        assert!(err.contains("`pool-0`"));
    }

    #[test]
    fn test_weighted_rejects_second_default_rule() {
        let descriptor = DynamicDescriptor::new()
            .with_pool("pool-0", Pool::new(vec![PoolValue::new("1.1.1.1").with_weight(5)]))
            .with_pool("pool-1", Pool::new(vec![PoolValue::new("3.3.3.3").with_weight(2)]))
            .with_rule(Rule::default_rule("pool-0"))
            .with_rule(Rule::default_rule("pool-1"));

        assert!(message(classify(&record(descriptor), ZONE)).contains("is not the last rule"));
    }

    #[test]
    fn test_dynamic_requires_supported_type() {
        let mx = CanonicalRecord::new("www", RecordType::Mx, 300)
            .with_text_values(["10 mx."])
            .with_dynamic(geo_descriptor());
        assert!(message(classify(&mx, ZONE)).contains("not supported for MX"));
    }

    #[test]
    fn test_encode_dispatch() {
        match encode(&record(weighted_descriptor()), ZONE).unwrap() {
            Some(SteeringConfig::Weighted(config)) => assert_eq!(config.weighted_ips.len(), 2),
            other => panic!("unexpected steering {:?}", other),
        }

        let serviced = record(plain_descriptor()).with_healthcheck(HealthCheck::default());
        match encode(&serviced, ZONE).unwrap() {
            Some(SteeringConfig::HttpService(config)) => {
                assert_eq!(config.url, "https://www.unit.tests/_dns")
            }
            other => panic!("unexpected steering {:?}", other),
        }
    }

    #[test]
    fn test_decode_prefers_geo() {
        let mut wire = WireRecord::new("www", "A", 300, "9.9.9.9");
        wire.geo_ip_config = Some(geo::encode(&geo_descriptor()).unwrap());
        wire.weighted_config = Some(weighted::encode(&weighted_descriptor()).unwrap());

        let decoded = decode(&wire, "www.unit.tests.").unwrap();
        assert_eq!(decoded.descriptor, geo_descriptor());
        assert!(decoded.healthcheck.is_none());
    }

    #[test]
    fn test_attach() {
        let config = SteeringConfig::Weighted(weighted::encode(&weighted_descriptor()).unwrap());
        let wire = config.attach(WireRecord::new("www", "A", 300, "9.9.9.9"));
        assert!(wire.weighted_config.is_some());
        assert!(wire.geo_ip_config.is_none());
    }
}
