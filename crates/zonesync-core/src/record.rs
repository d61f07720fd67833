//! Canonical record model
//!
//! Provider-agnostic representation of one record set (name + type) as the
//! orchestrator sees it. Values are typed per record type; dynamic records
//! additionally carry a [`DynamicDescriptor`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dynamic::DynamicDescriptor;
use crate::error::Error;

/// Supported DNS record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Alias,
    Caa,
    Cname,
    Loc,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Spf,
    Srv,
    Sshfp,
    Txt,
}

impl RecordType {
    /// Every supported type, in a fixed order
    pub const ALL: [RecordType; 14] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Alias,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Loc,
        RecordType::Mx,
        RecordType::Naptr,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Spf,
        RecordType::Srv,
        RecordType::Sshfp,
        RecordType::Txt,
    ];

    /// Type name as written in zone files and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Alias => "ALIAS",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Loc => "LOC",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Sshfp => "SSHFP",
            RecordType::Txt => "TXT",
        }
    }

    /// Type used on the wire. SPF is published as TXT.
    pub fn wire_type(&self) -> RecordType {
        match self {
            RecordType::Spf => RecordType::Txt,
            other => *other,
        }
    }

    /// Types holding exactly one value
    pub fn is_single_value(&self) -> bool {
        matches!(self, RecordType::Alias | RecordType::Cname | RecordType::Ptr)
    }

    /// Types that may carry traffic steering configuration
    pub fn supports_dynamic(&self) -> bool {
        matches!(
            self,
            RecordType::A | RecordType::Aaaa | RecordType::Cname | RecordType::Alias
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| Error::invalid_input(format!("Unsupported record type: {}", s)))
    }
}

/// CAA value: `<flags> <tag> "<value>"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaValue {
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

/// LOC value (RFC 1876 presentation fields)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocValue {
    pub lat_degrees: u8,
    pub lat_minutes: u8,
    pub lat_seconds: f64,
    pub lat_direction: char,
    pub long_degrees: u8,
    pub long_minutes: u8,
    pub long_seconds: f64,
    pub long_direction: char,
    pub altitude: f64,
    pub size: f64,
    pub precision_horz: f64,
    pub precision_vert: f64,
}

/// MX value: `<preference> <exchange>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxValue {
    pub preference: u16,
    pub exchange: String,
}

/// NAPTR value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaptrValue {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub service: String,
    pub regexp: String,
    pub replacement: String,
}

/// SRV value: `<priority> <weight> <port> <target>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvValue {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// SSHFP value: `<algorithm> <fingerprint_type> <fingerprint>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshfpValue {
    pub algorithm: u8,
    pub fingerprint_type: u8,
    pub fingerprint: String,
}

/// One value of a record set
///
/// Address, name and text types (A, AAAA, ALIAS, CNAME, NS, PTR, SPF, TXT)
/// hold their value verbatim in [`RecordValue::Text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Text(String),
    Caa(CaaValue),
    Loc(LocValue),
    Mx(MxValue),
    Naptr(NaptrValue),
    Srv(SrvValue),
    Sshfp(SshfpValue),
}

impl RecordValue {
    /// Build a text value
    pub fn text(value: impl Into<String>) -> Self {
        RecordValue::Text(value.into())
    }

    /// The verbatim value for text-like types
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Protocol used by an attached health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthCheckProtocol {
    Http,
    Https,
    Tcp,
}

impl HealthCheckProtocol {
    /// URL scheme for this protocol
    pub fn scheme(&self) -> &'static str {
        match self {
            HealthCheckProtocol::Http => "http",
            HealthCheckProtocol::Https => "https",
            HealthCheckProtocol::Tcp => "tcp",
        }
    }
}

/// Health check attached to a record by the orchestrator
///
/// Only consumed when building health-serviced steering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub protocol: HealthCheckProtocol,
    /// Host header to probe with; defaults to the record's fqdn
    #[serde(default)]
    pub host: Option<String>,
    pub port: u16,
    pub path: String,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            protocol: HealthCheckProtocol::Https,
            host: None,
            port: 443,
            path: "/_dns".to_string(),
        }
    }
}

impl HealthCheck {
    /// Host to probe, falling back to `fqdn` without its trailing dot
    pub fn host<'a>(&'a self, fqdn: &'a str) -> &'a str {
        match &self.host {
            Some(host) => host,
            None => fqdn.trim_end_matches('.'),
        }
    }
}

/// A record set in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Relative name, empty for the zone apex
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub ttl: u32,
    pub values: Vec<RecordValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthCheck>,
}

impl CanonicalRecord {
    /// Create an empty record set
    pub fn new(name: impl Into<String>, record_type: RecordType, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            values: Vec::new(),
            dynamic: None,
            healthcheck: None,
        }
    }

    /// Set the values
    pub fn with_values(mut self, values: Vec<RecordValue>) -> Self {
        self.values = values;
        self
    }

    /// Set text values
    pub fn with_text_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(RecordValue::text).collect();
        self
    }

    /// Attach a dynamic descriptor
    pub fn with_dynamic(mut self, dynamic: DynamicDescriptor) -> Self {
        self.dynamic = Some(dynamic);
        self
    }

    /// Attach a health check
    pub fn with_healthcheck(mut self, healthcheck: HealthCheck) -> Self {
        self.healthcheck = Some(healthcheck);
        self
    }

    /// Fully qualified name within `zone_name` (which ends with a dot)
    pub fn fqdn(&self, zone_name: &str) -> String {
        if self.name.is_empty() {
            zone_name.to_string()
        } else {
            format!("{}.{}", self.name, zone_name)
        }
    }

    /// Identity of the record set inside a zone
    pub fn key(&self) -> (&str, RecordType) {
        (&self.name, self.record_type)
    }
}
