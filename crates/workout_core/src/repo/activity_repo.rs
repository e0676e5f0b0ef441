//! Activity collection persistence over one durable slot.
//!
//! # Responsibility
//! - Serialize the full ordered collection as a JSON array of records.
//! - Parse the slot back into plain records, and optionally into typed
//!   activities by branching on each record's `kind`.
//!
//! # Invariants
//! - The slot key is fixed per repository instance.
//! - Parsed records are plain data; typed reconstruction is an explicit,
//!   validating step (`load`), never implied by `load_records`.

use crate::model::activity::Activity;
use crate::model::record::ActivityRecord;
use crate::repo::slot_repo::{RepoResult, SlotRepository};
use log::{debug, info};

/// Slot key holding the serialized activity collection.
pub const DEFAULT_STORAGE_KEY: &str = "workouts";

/// Persistence adapter for the activity collection.
pub struct ActivityRepository<S: SlotRepository> {
    slots: S,
    key: String,
}

impl<S: SlotRepository> ActivityRepository<S> {
    /// Uses `DEFAULT_STORAGE_KEY`.
    pub fn new(slots: S) -> Self {
        Self::with_key(slots, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(slots: S, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Overwrites the slot with the whole collection, in order.
    pub fn save(&self, activities: &[Activity]) -> RepoResult<()> {
        let records: Vec<ActivityRecord> = activities.iter().map(ActivityRecord::from).collect();
        let payload = serde_json::to_string(&records)?;
        self.slots.write_slot(&self.key, &payload)?;
        debug!(
            "event=activities_save module=repo status=ok key={} count={} bytes={}",
            self.key,
            records.len(),
            payload.len()
        );
        Ok(())
    }

    /// Reads the slot as plain records.
    ///
    /// Returns an empty list when the slot is absent.
    ///
    /// # Errors
    /// - `Serialization` when the stored text is not a record array.
    pub fn load_records(&self) -> RepoResult<Vec<ActivityRecord>> {
        let Some(payload) = self.slots.read_slot(&self.key)? else {
            info!(
                "event=activities_load module=repo status=miss key={}",
                self.key
            );
            return Ok(Vec::new());
        };

        let records: Vec<ActivityRecord> = serde_json::from_str(&payload)?;
        info!(
            "event=activities_load module=repo status=ok key={} count={}",
            self.key,
            records.len()
        );
        Ok(records)
    }

    /// Reads the slot and rebuilds typed activities from the stored `kind`.
    ///
    /// # Errors
    /// - `Serialization` as for `load_records`.
    /// - `InvalidData` when any record does not match its discriminant or
    ///   breaks the input policy. No partial collection is returned.
    pub fn load(&self) -> RepoResult<Vec<Activity>> {
        let activities = self
            .load_records()?
            .into_iter()
            .map(Activity::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    /// Removes the slot; a missing slot is not an error.
    pub fn erase(&self) -> RepoResult<()> {
        let existed = self.slots.remove_slot(&self.key)?;
        info!(
            "event=activities_erase module=repo status=ok key={} existed={}",
            self.key, existed
        );
        Ok(())
    }
}
