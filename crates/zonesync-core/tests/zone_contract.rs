//! Architectural Contract Test: Canonical Zones & Plans
//!
//! Constraints verified:
//! - Canonical zones load from their JSON form with typed values
//! - Loading a zone enforces the same rules as building one
//! - Dynamic descriptors loaded from JSON satisfy the pool invariants
//! - Plans are keyed by (name, type) and never reorder within a bucket

use serde_json::json;
use zonesync_core::{Change, Plan, PoolValueStatus, RecordType, RecordValue, Zone};

fn zone_from(value: serde_json::Value) -> Zone {
    serde_json::from_value(value).expect("valid zone")
}

#[test]
fn canonical_zone_loads_typed_values() {
    let zone = zone_from(json!({
        "name": "unit.tests.",
        "records": [
            {"name": "", "type": "A", "ttl": 300, "values": ["1.2.3.4", "1.2.3.5"]},
            {"name": "mx", "type": "MX", "ttl": 300, "values": [
                {"preference": 10, "exchange": "smtp-1.unit.tests."}
            ]},
            {"name": "_sip._udp", "type": "SRV", "ttl": 600, "values": [
                {"priority": 10, "weight": 20, "port": 5060, "target": "sip.unit.tests."}
            ]},
            {"name": "naptr", "type": "NAPTR", "ttl": 600, "values": [
                {"order": 10, "preference": 20, "flags": "U", "service": "SIP+D2U",
                 "regexp": "!^.*$!sip:info@unit.tests!", "replacement": "."}
            ]}
        ]
    }));

    assert_eq!(zone.len(), 4);
    assert_eq!(zone.api_name(), "unit.tests");
    assert_eq!(
        zone.get("", RecordType::A).unwrap().values,
        vec![RecordValue::text("1.2.3.4"), RecordValue::text("1.2.3.5")]
    );
    assert!(matches!(
        zone.get("mx", RecordType::Mx).unwrap().values[0],
        RecordValue::Mx(_)
    ));
    assert!(matches!(
        zone.get("_sip._udp", RecordType::Srv).unwrap().values[0],
        RecordValue::Srv(_)
    ));
    assert!(matches!(
        zone.get("naptr", RecordType::Naptr).unwrap().values[0],
        RecordValue::Naptr(_)
    ));
}

#[test]
fn dynamic_descriptor_loads_with_defaults() {
    let zone = zone_from(json!({
        "name": "unit.tests.",
        "records": [{
            "name": "www", "type": "A", "ttl": 300, "values": ["5.5.5.5"],
            "dynamic": {
                "pools": {
                    "pool-0": {"fallback": "pool-1", "values": [{"value": "1.1.1.1"}]},
                    "pool-1": {"values": [{"value": "5.5.5.5"}]}
                },
                "rules": [
                    {"pool": "pool-0", "geos": ["eu-fr", "EU-BE"]},
                    {"pool": "pool-1"}
                ]
            }
        }]
    }));

    let record = zone.get("www", RecordType::A).unwrap();
    let descriptor = record.dynamic.as_ref().unwrap();

    let value = &descriptor.pools["pool-0"].values[0];
    assert_eq!(value.weight, 1);
    assert_eq!(value.status, PoolValueStatus::Obey);

    let geos: Vec<String> = descriptor.rules[0]
        .geos
        .as_ref()
        .unwrap()
        .iter()
        .map(|g| g.to_string())
        .collect();
    assert_eq!(geos, vec!["EU-FR", "EU-BE"]);

    assert!(descriptor.check_pool_references().is_ok());
    assert!(descriptor.check_default_rule_last().is_ok());
    assert!(descriptor.check_pool_contiguity().is_ok());
}

#[test]
fn zone_names_must_be_absolute() {
    assert!(Zone::new("unit.tests").is_err());
    assert!(Zone::new("unit.tests.").is_ok());

    let loaded = serde_json::from_value::<Zone>(json!({"name": "unit.tests", "records": []}));
    let err = loaded.unwrap_err().to_string();
    assert!(err.contains("must end with a dot"));
}

#[test]
fn loaded_zones_reject_duplicate_record_sets() {
    let loaded = serde_json::from_value::<Zone>(json!({
        "name": "unit.tests.",
        "records": [
            {"name": "www", "type": "A", "ttl": 300, "values": ["1.1.1.1"]},
            {"name": "www", "type": "A", "ttl": 600, "values": ["2.2.2.2"]}
        ]
    }));

    let err = loaded.unwrap_err().to_string();
    assert!(err.contains("Duplicate record www.unit.tests. A"));
}

#[test]
fn plan_keys_records_by_name_and_type() {
    let existing = zone_from(json!({
        "name": "unit.tests.",
        "records": [
            {"name": "www", "type": "A", "ttl": 300, "values": ["1.1.1.1"]},
            {"name": "www", "type": "AAAA", "ttl": 300, "values": ["2001:db8::1"]},
            {"name": "old", "type": "TXT", "ttl": 300, "values": ["gone"]}
        ]
    }));
    let desired = zone_from(json!({
        "name": "unit.tests.",
        "records": [
            {"name": "www", "type": "A", "ttl": 600, "values": ["1.1.1.1"]},
            {"name": "www", "type": "AAAA", "ttl": 300, "values": ["2001:db8::1"]},
            {"name": "new", "type": "TXT", "ttl": 300, "values": ["hello"]}
        ]
    }));

    let plan = Plan::compute(&existing, desired, true);

    assert_eq!(plan.changes.len(), 3);
    assert!(matches!(&plan.changes[0], Change::Update { desired, .. } if desired.ttl == 600));
    assert!(matches!(&plan.changes[1], Change::Create(r) if r.name == "new"));
    assert!(matches!(&plan.changes[2], Change::Delete(r) if r.name == "old"));
}
