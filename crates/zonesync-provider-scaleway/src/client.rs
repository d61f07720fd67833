// # Scaleway DNS client
//
// The two API calls the provider needs, on top of a `Transport`:
//
// - `GET /dns-zones/{zone}/records?page_size=1000`
// - `PATCH /dns-zones/{zone}/records`
//
// ## Status handling
//
// Read: 404 means the zone is absent. 403 means the zone is absent too when
// zone creation is allowed, and `UnknownDomain` otherwise.
//
// Write: 403 with zone creation disabled becomes `UnknownDomain`. Every
// other non-2xx surfaces as an API error.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use zonesync_core::traits::{Method, Transport, TransportRequest};
use zonesync_core::{Error, Result};

use crate::wire::{ChangeOp, RecordChangesRequest, WireRecord};

/// Page size requested when listing records
pub const PAGE_SIZE: &str = "1000";

#[derive(Clone)]
pub struct ScalewayClient {
    transport: Arc<dyn Transport>,
    create_zone: bool,
}

impl std::fmt::Debug for ScalewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalewayClient")
            .field("create_zone", &self.create_zone)
            .finish_non_exhaustive()
    }
}

impl ScalewayClient {
    pub fn new(transport: Arc<dyn Transport>, create_zone: bool) -> Self {
        Self {
            transport,
            create_zone,
        }
    }

    pub fn create_zone(&self) -> bool {
        self.create_zone
    }

    fn records_path(zone: &str) -> String {
        format!("/dns-zones/{}/records", zone)
    }

    /// Flat records of `zone`, or `None` when the zone does not exist
    ///
    /// Entries that do not parse as records are skipped.
    pub async fn zone_records(&self, zone: &str) -> Result<Option<Vec<WireRecord>>> {
        let request = TransportRequest::new(Method::Get, Self::records_path(zone))
            .with_param("page_size", PAGE_SIZE);

        let body = match self.transport.request(request).await?.into_json() {
            Ok(body) => body,
            Err(e) if e.is_not_found() => {
                debug!("Zone {} not found", zone);
                return Ok(None);
            }
            Err(e) if e.is_forbidden() => {
                if self.create_zone {
                    debug!("Zone {} forbidden, treating as absent", zone);
                    return Ok(None);
                }
                return Err(Error::unknown_domain());
            }
            Err(e) => return Err(e),
        };

        let entries = match body.get("records") {
            Some(Value::Array(entries)) => entries.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(Error::provider(
                    "scaleway",
                    format!("Invalid response format: records is {}", other),
                ));
            }
        };

        let records = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<WireRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable record in zone {}: {}", zone, e);
                    None
                }
            })
            .collect();

        Ok(Some(records))
    }

    /// Submit one ordered batch of changes for `zone`
    pub async fn record_updates(&self, zone: &str, changes: Vec<ChangeOp>) -> Result<()> {
        let body = RecordChangesRequest {
            return_all_records: false,
            disallow_new_zone_creation: !self.create_zone,
            changes,
        };
        let request = TransportRequest::new(Method::Patch, Self::records_path(zone))
            .with_body(serde_json::to_value(&body)?);

        match self.transport.request(request).await?.into_json() {
            Ok(_) => Ok(()),
            Err(e) if e.is_forbidden() && !self.create_zone => Err(Error::unknown_domain()),
            Err(e) => Err(e),
        }
    }
}
