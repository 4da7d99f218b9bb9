//! LIFO resource tracking for test cleanup
//!
//! Every resource created through the harness is recorded here. Records are
//! inserted at the head, so iterating front-to-back during cleanup deletes
//! resources in reverse creation order, which respects the dependency chain
//! (snapshots before shares, shares before their share-network).

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::Value;
use share_harness_common::ResourceKind;
use tracing::{debug, info};

use crate::api::SharesApi;
use crate::error::HarnessError;
use crate::wait::{self, WaitConfig};

/// One tracked resource
///
/// The body is the opaque resource representation as returned by the API;
/// the tracker only relies on its `"id"` field. Records are never removed,
/// only flipped to `deleted`, so the tracker doubles as a log of everything
/// a test run created.
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    pub body: Value,
    pub deleted: bool,
    pub recorded_at: DateTime<Utc>,
}

impl ResourceRecord {
    /// The resource id from the body, if present
    pub fn id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }
}

/// What a cleanup pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    /// Resources actually deleted
    pub deleted: usize,
    /// Resources that were already gone (delete hit not-found)
    pub already_gone: usize,
    /// Records skipped because a previous pass already deleted them
    pub skipped: usize,
}

/// Thread-safe LIFO registry of resources created during a test run
///
/// `record` should be called immediately after the API reports a resource
/// created, before any fallible operation (such as a status wait) that
/// could leave it orphaned.
#[derive(Debug, Default)]
pub struct ResourceTracker {
    records: Mutex<VecDeque<ResourceRecord>>,
}

impl ResourceTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a created resource; the newest record goes to the head so
    /// cleanup visits it first
    pub fn record(&self, kind: ResourceKind, body: Value) {
        let record = ResourceRecord {
            kind,
            body,
            deleted: false,
            recorded_at: Utc::now(),
        };
        debug!(kind = %kind, id = ?record.id(), "Tracking resource");
        let mut records = self.records.lock().unwrap();
        records.push_front(record);
    }

    /// Snapshot of all records in cleanup order (reverse creation order)
    pub fn records(&self) -> Vec<ResourceRecord> {
        self.records.lock().unwrap().iter().cloned().collect()
    }

    /// Number of tracked records, deleted ones included
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    /// Delete every undeleted resource, head first.
    ///
    /// "Not found" from a delete means the resource is already gone and
    /// counts as success. Any other error aborts the remaining cleanup and
    /// propagates; records processed before the abort stay marked deleted,
    /// so a repeated call resumes where this one stopped. After each delete
    /// the tracker waits until the resource's GET confirms it is gone.
    pub async fn cleanup<S: SharesApi>(
        &self,
        client: &S,
        wait_config: &WaitConfig,
    ) -> Result<CleanupOutcome, HarnessError> {
        let mut outcome = CleanupOutcome::default();
        let mut index = 0;

        loop {
            // Snapshot one record at a time; the lock cannot be held across
            // the delete call.
            let record = {
                let records = self.records.lock().unwrap();
                match records.get(index) {
                    Some(r) => r.clone(),
                    None => break,
                }
            };
            index += 1;

            if record.deleted {
                outcome.skipped += 1;
                continue;
            }

            let id = record
                .id()
                .ok_or(HarnessError::MissingId { kind: record.kind })?
                .to_string();

            match delete_by_kind(client, record.kind, &id).await {
                Ok(()) => {
                    info!(kind = %record.kind, id = %id, "Deleted");
                    outcome.deleted += 1;
                }
                Err(e) if e.is_not_found() => {
                    debug!(kind = %record.kind, id = %id, "Already deleted");
                    outcome.already_gone += 1;
                }
                Err(e) => return Err(e.into()),
            }

            {
                let mut records = self.records.lock().unwrap();
                if let Some(r) = records.get_mut(index - 1) {
                    r.deleted = true;
                }
            }

            wait::wait_for_deletion(client, record.kind, &id, wait_config, None).await?;
        }

        Ok(outcome)
    }
}

/// Dispatch the delete call for a resource kind
async fn delete_by_kind<S: SharesApi>(
    client: &S,
    kind: ResourceKind,
    id: &str,
) -> Result<(), crate::error::ApiError> {
    match kind {
        ResourceKind::Share => client.delete_share(id).await,
        ResourceKind::Snapshot => client.delete_snapshot(id).await,
        ResourceKind::ShareNetwork => client.delete_share_network(id).await,
        ResourceKind::SecurityService => client.delete_security_service(id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_are_lifo() {
        let tracker = ResourceTracker::new();
        tracker.record(ResourceKind::Share, json!({"id": "share-1"}));
        tracker.record(ResourceKind::Snapshot, json!({"id": "snap-1"}));
        tracker.record(ResourceKind::Share, json!({"id": "share-2"}));

        let ids: Vec<_> = tracker
            .records()
            .iter()
            .map(|r| r.id().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["share-2", "snap-1", "share-1"]);
    }

    #[test]
    fn record_id_requires_string_id() {
        let tracker = ResourceTracker::new();
        tracker.record(ResourceKind::Share, json!({"name": "no id here"}));
        let records = tracker.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].id().is_none());
        assert!(!records[0].deleted);
    }

    #[test]
    fn len_counts_deleted_records_too() {
        let tracker = ResourceTracker::new();
        assert!(tracker.is_empty());
        tracker.record(ResourceKind::ShareNetwork, json!({"id": "sn-1"}));
        assert_eq!(tracker.len(), 1);
        assert!(!tracker.is_empty());
    }
}
