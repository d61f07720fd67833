//! Scaleway DNS wire format
//!
//! Flat records carry a single `data` string. Address and alias records may
//! additionally carry exactly one traffic steering extension:
//! `geo_ip_config`, `weighted_config` or `http_service_config`.

use serde::{Deserialize, Serialize};
use zonesync_core::CanonicalRecord;

/// One flat record as listed and submitted by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    pub name: String,
    /// Raw type name; the API may list types this crate does not support
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_ip_config: Option<GeoIpConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_config: Option<WeightedConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_service_config: Option<HttpServiceConfig>,
}

impl WireRecord {
    /// Plain record without steering configuration
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl,
            data: data.into(),
            geo_ip_config: None,
            weighted_config: None,
            http_service_config: None,
        }
    }

    /// Whether any steering extension is attached
    pub fn has_steering(&self) -> bool {
        self.geo_ip_config.is_some()
            || self.weighted_config.is_some()
            || self.http_service_config.is_some()
    }
}

/// Geo-IP steering: first matching entry wins, `default` otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoIpConfig {
    pub matches: Vec<GeoIpMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// One geo-IP target and the data served to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoIpMatch {
    #[serde(default)]
    pub continents: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    pub data: String,
}

/// Weighted round-robin steering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedConfig {
    pub weighted_ips: Vec<WeightedIp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedIp {
    pub ip: String,
    pub weight: u32,
}

/// Health-serviced steering: serve the IPs whose HTTP probe succeeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServiceConfig {
    pub ips: Vec<String>,
    #[serde(default)]
    pub must_contain: Option<String>,
    pub url: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub strategy: String,
}

/// Identity of a record set in change operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdFields {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
}

impl IdFields {
    /// Identity of `record` as published (SPF is addressed as TXT)
    pub fn for_record(record: &CanonicalRecord) -> Self {
        Self {
            record_type: record.record_type.wire_type().as_str().to_string(),
            name: record.name.clone(),
        }
    }
}

/// One entry of the `changes` list of a PATCH request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Delete {
        #[serde(rename = "idFields")]
        id_fields: IdFields,
    },
    Set {
        #[serde(rename = "idFields")]
        id_fields: IdFields,
        records: Vec<WireRecord>,
    },
    Add {
        records: Vec<WireRecord>,
    },
}

/// Body of `PATCH /dns-zones/{zone}/records`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChangesRequest {
    pub return_all_records: bool,
    pub disallow_new_zone_creation: bool,
    pub changes: Vec<ChangeOp>,
}
