//! Test doubles and fixtures for provider contract tests
//!
//! `MockTransport` answers requests from a queue of canned responses and
//! records every request it sees, so tests can assert both the outcome and
//! the exact calls made.

#![allow(dead_code)]

use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use zonesync_core::record::{CaaValue, LocValue, MxValue, NaptrValue, SrvValue, SshfpValue};
use zonesync_core::traits::{Transport, TransportRequest, TransportResponse};
use zonesync_core::{
    CanonicalRecord, DynamicDescriptor, Error, GeoCode, HealthCheck, Pool, PoolValue, RecordType,
    RecordValue, Result, Rule, Zone,
};
use zonesync_provider_scaleway::ScalewayProvider;

pub const ZONE: &str = "unit.tests.";

/// A transport that replays canned responses in order
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue one response
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(TransportResponse::new(status, body));
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Body of the last request, which must have had one
    pub fn last_body(&self) -> Value {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|r| r.body.clone())
            .expect("last request carried a body")
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn request(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::http("no canned response left"))
    }
}

/// Provider wired to a fresh mock transport
pub fn provider(create_zone: bool) -> (ScalewayProvider, Arc<MockTransport>) {
    let transport = MockTransport::new();
    let provider = ScalewayProvider::with_transport(transport.clone(), create_zone);
    (provider, transport)
}

pub fn ok_records() -> Value {
    serde_json::from_str(include_str!("../fixtures/scaleway-ok.json")).expect("valid fixture")
}

pub fn nok_records() -> Value {
    serde_json::from_str(include_str!("../fixtures/scaleway-nok.json")).expect("valid fixture")
}

pub fn empty_zone() -> Zone {
    Zone::new(ZONE).expect("valid zone name")
}

fn geos(codes: &[&str]) -> Vec<GeoCode> {
    codes.iter().map(|c| c.parse().expect("valid geo")).collect()
}

/// Geo descriptor used by the `www` record
pub fn geo_descriptor() -> DynamicDescriptor {
    let single = |value: &str| vec![PoolValue::new(value)];
    DynamicDescriptor::new()
        .with_pool("pool-0", Pool::new(single("2.2.2.2")).with_fallback("pool-3"))
        .with_pool("pool-1", Pool::new(single("3.3.3.3")).with_fallback("pool-3"))
        .with_pool("pool-2", Pool::new(single("4.4.4.4")).with_fallback("pool-3"))
        .with_pool("pool-3", Pool::new(single("5.5.5.5")))
        .with_rule(Rule::geo("pool-0", geos(&["EU-BE", "EU-FR"])))
        .with_rule(Rule::geo("pool-1", geos(&["EU"])))
        .with_rule(Rule::geo("pool-2", geos(&["NA-US"])))
        .with_rule(Rule::default_rule("pool-3"))
}

pub fn weighted_descriptor() -> DynamicDescriptor {
    DynamicDescriptor::new()
        .with_pool(
            "pool-0",
            Pool::new(vec![
                PoolValue::new("1.1.1.1").with_weight(10),
                PoolValue::new("2.2.2.2").with_weight(20),
            ]),
        )
        .with_rule(Rule::default_rule("pool-0"))
}

pub fn serviced_descriptor() -> DynamicDescriptor {
    DynamicDescriptor::new()
        .with_pool(
            "pool-0",
            Pool::new(vec![PoolValue::new("1.1.1.1"), PoolValue::new("2.2.2.2")]),
        )
        .with_rule(Rule::default_rule("pool-0"))
}

/// The zone described by `scaleway-ok.json`, in fixture order
pub fn expected_zone() -> Zone {
    let mut zone = empty_zone();
    let records = vec![
        CanonicalRecord::new("", RecordType::Alias, 1800).with_text_values(["alias.unit.tests."]),
        CanonicalRecord::new("sub", RecordType::Ns, 1800)
            .with_text_values(["6.2.3.4.", "7.2.3.4."]),
        CanonicalRecord::new("sub", RecordType::Caa, 1800).with_values(vec![RecordValue::Caa(
            CaaValue {
                flags: 0,
                tag: "issue".to_string(),
                value: "ca.unit.tests".to_string(),
            },
        )]),
        CanonicalRecord::new("sub", RecordType::Loc, 1800).with_values(vec![RecordValue::Loc(
            LocValue {
                lat_degrees: 51,
                lat_minutes: 57,
                lat_seconds: 0.123,
                lat_direction: 'N',
                long_degrees: 5,
                long_minutes: 54,
                long_seconds: 0.0,
                long_direction: 'E',
                altitude: 4.0,
                size: 1.0,
                precision_horz: 10000.0,
                precision_vert: 10.0,
            },
        )]),
        CanonicalRecord::new("sub", RecordType::Mx, 1800).with_values(vec![
            RecordValue::Mx(MxValue {
                preference: 10,
                exchange: "smtp-1.unit.tests.".to_string(),
            }),
            RecordValue::Mx(MxValue {
                preference: 20,
                exchange: "smtp-2.unit.tests.".to_string(),
            }),
        ]),
        CanonicalRecord::new("sub", RecordType::Naptr, 1800).with_values(vec![
            RecordValue::Naptr(NaptrValue {
                order: 10,
                preference: 20,
                flags: "U".to_string(),
                service: "SIP+D2U".to_string(),
                regexp: "!^.*$!sip:info@bar.example.com!".to_string(),
                replacement: ".".to_string(),
            }),
        ]),
        CanonicalRecord::new("sub", RecordType::Txt, 1800)
            .with_text_values(["v=spf1 ip4:127.0.0.1/24 ip4:192.168.1.1 a -all"]),
        CanonicalRecord::new("sub", RecordType::Sshfp, 1800).with_values(vec![
            RecordValue::Sshfp(SshfpValue {
                algorithm: 2,
                fingerprint_type: 1,
                fingerprint: "123456789abcdef67890123456789abcdef67899".to_string(),
            }),
        ]),
        CanonicalRecord::new("_srv._tcp2", RecordType::Srv, 1800).with_values(vec![
            RecordValue::Srv(SrvValue {
                priority: 10,
                weight: 20,
                port: 30,
                target: "cname.unit.tests.".to_string(),
            }),
        ]),
        CanonicalRecord::new("cname", RecordType::Cname, 300).with_text_values(["www.unit.tests."]),
        CanonicalRecord::new("www", RecordType::A, 300)
            .with_text_values(["5.5.5.5"])
            .with_dynamic(geo_descriptor()),
        CanonicalRecord::new("weighted", RecordType::A, 300)
            .with_text_values(["1.1.1.1", "2.2.2.2"])
            .with_dynamic(weighted_descriptor()),
        CanonicalRecord::new("hc", RecordType::A, 300)
            .with_text_values(["1.1.1.1"])
            .with_dynamic(serviced_descriptor())
            .with_healthcheck(HealthCheck::default()),
    ];
    for record in records {
        zone.add_record(record).expect("unique record");
    }
    zone
}

/// Records of `zone` keyed by "name TYPE", for order-insensitive asserts
pub fn by_key(zone: &Zone) -> BTreeMap<String, CanonicalRecord> {
    zone.records
        .iter()
        .map(|r| (format!("{} {}", r.name, r.record_type), r.clone()))
        .collect()
}
