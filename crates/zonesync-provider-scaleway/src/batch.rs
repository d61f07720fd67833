// # Change batch assembly
//
// Turns the orchestrator's ordered changes into the `changes` list of one
// PATCH request. Deletes go first, then updates, then creates; order inside
// each bucket is kept as given.

use zonesync_core::{CanonicalRecord, Change, Result};

use crate::codec;
use crate::steering;
use crate::wire::{ChangeOp, IdFields, WireRecord};

/// Wire name for the zone apex
pub const APEX_NAME: &str = "@";

/// Published name of a relative record name
pub fn record_name(name: &str) -> &str {
    if name.is_empty() { APEX_NAME } else { name }
}

/// Relative name of a published record name
pub fn canonical_name(name: &str) -> &str {
    if name == APEX_NAME { "" } else { name }
}

/// Encode one canonical record set into its flat wire records
///
/// Dynamic records emit one wire record per value, each carrying the same
/// steering extension.
pub fn encode_record(record: &CanonicalRecord, zone_name: &str) -> Result<Vec<WireRecord>> {
    let steering = steering::encode(record, zone_name)?;
    let wire_type = record.record_type.wire_type();

    record
        .values
        .iter()
        .map(|value| {
            let wire = WireRecord::new(
                record_name(&record.name),
                wire_type.as_str(),
                record.ttl,
                codec::encode_value(record.record_type, value)?,
            );
            Ok(match &steering {
                Some(config) => config.attach(wire),
                None => wire,
            })
        })
        .collect()
}

/// Assemble the ordered change list for one batch
pub fn assemble(changes: &[Change], zone_name: &str) -> Result<Vec<ChangeOp>> {
    let mut deletes = Vec::new();
    let mut updates = Vec::new();
    let mut creates = Vec::new();

    for change in changes {
        match change {
            Change::Delete(record) => deletes.push(ChangeOp::Delete {
                id_fields: IdFields::for_record(record),
            }),
            Change::Update { existing, desired } => updates.push(ChangeOp::Set {
                id_fields: IdFields::for_record(existing),
                records: encode_record(desired, zone_name)?,
            }),
            Change::Create(record) => creates.push(ChangeOp::Add {
                records: encode_record(record, zone_name)?,
            }),
        }
    }

    deletes.extend(updates);
    deletes.extend(creates);
    Ok(deletes)
}
