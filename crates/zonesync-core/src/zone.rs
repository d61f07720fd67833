//! Zones, changes and plans
//!
//! A [`Zone`] is the set of canonical records under one zone name. A
//! [`Plan`] pairs the desired zone with the ordered [`Change`]s needed to
//! reach it from the provider's current state.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{CanonicalRecord, RecordType};

/// Canonical records under one zone name
///
/// Deserialization goes through [`Zone::new`] and [`Zone::add_record`], so a
/// loaded zone has an absolute name and no duplicate record sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ZoneDocument")]
pub struct Zone {
    /// Zone name, always ending with a dot (e.g. `unit.tests.`)
    pub name: String,
    pub records: Vec<CanonicalRecord>,
}

/// Unchecked serialized form of a [`Zone`]
#[derive(Deserialize)]
struct ZoneDocument {
    name: String,
    #[serde(default)]
    records: Vec<CanonicalRecord>,
}

impl TryFrom<ZoneDocument> for Zone {
    type Error = Error;

    fn try_from(document: ZoneDocument) -> Result<Self> {
        let mut zone = Zone::new(document.name)?;
        for record in document.records {
            zone.add_record(record)?;
        }
        Ok(zone)
    }
}

impl Zone {
    /// Create an empty zone
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !name.ends_with('.') {
            return Err(Error::invalid_input(format!(
                "Zone name must end with a dot: {}",
                name
            )));
        }
        Ok(Self {
            name,
            records: Vec::new(),
        })
    }

    /// Zone name as the provider API expects it (no trailing dot)
    pub fn api_name(&self) -> &str {
        self.name.trim_end_matches('.')
    }

    /// Add a record set. Duplicate name/type pairs are rejected.
    pub fn add_record(&mut self, record: CanonicalRecord) -> Result<()> {
        if self.get(&record.name, record.record_type).is_some() {
            return Err(Error::invalid_input(format!(
                "Duplicate record {} {}",
                record.fqdn(&self.name),
                record.record_type
            )));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, name: &str, record_type: RecordType) -> Option<&CanonicalRecord> {
        self.records
            .iter()
            .find(|r| r.name == name && r.record_type == record_type)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One change produced by the orchestrator's diff
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Create(CanonicalRecord),
    Update {
        existing: CanonicalRecord,
        desired: CanonicalRecord,
    },
    Delete(CanonicalRecord),
}

impl Change {
    /// The record whose identity the change targets
    pub fn record(&self) -> &CanonicalRecord {
        match self {
            Change::Create(record) | Change::Delete(record) => record,
            Change::Update { existing, .. } => existing,
        }
    }
}

/// Desired zone plus the changes needed to reach it
#[derive(Debug, Clone)]
pub struct Plan {
    pub desired: Zone,
    pub changes: Vec<Change>,
    /// Whether the zone existed when the plan was computed
    pub exists: bool,
}

impl Plan {
    /// Equality diff of `existing` against `desired`, keyed by name and type
    ///
    /// Creates and updates follow the desired zone's order, deletes follow
    /// the existing zone's order.
    pub fn compute(existing: &Zone, desired: Zone, exists: bool) -> Self {
        let mut changes = Vec::new();

        for record in &desired.records {
            match existing.get(&record.name, record.record_type) {
                None => changes.push(Change::Create(record.clone())),
                Some(current) if current != record => changes.push(Change::Update {
                    existing: current.clone(),
                    desired: record.clone(),
                }),
                Some(_) => {}
            }
        }

        for record in &existing.records {
            if desired.get(&record.name, record.record_type).is_none() {
                changes.push(Change::Delete(record.clone()));
            }
        }

        Self {
            desired,
            changes,
            exists,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
