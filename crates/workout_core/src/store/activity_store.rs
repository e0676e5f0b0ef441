//! Ordered activity collection with validated creation.

use crate::model::activity::{Activity, ActivityValidationError, NewActivity};
use chrono::{DateTime, Utc};
use log::{debug, warn};

/// Session-scoped ordered collection of activities.
#[derive(Debug, Default)]
pub struct ActivityStore {
    activities: Vec<Activity>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates, constructs and appends one activity stamped now.
    pub fn create(&mut self, request: NewActivity) -> Result<&Activity, ActivityValidationError> {
        self.create_at(request, Utc::now())
    }

    /// Validates, constructs and appends one activity created at `timestamp`.
    ///
    /// # Errors
    /// - Returns `ActivityValidationError` when inputs break the numeric
    ///   policy; the collection is not modified.
    pub fn create_at(
        &mut self,
        request: NewActivity,
        timestamp: DateTime<Utc>,
    ) -> Result<&Activity, ActivityValidationError> {
        let activity = match Activity::new(request, timestamp) {
            Ok(activity) => activity,
            Err(err) => {
                warn!(
                    "event=activity_create module=store status=rejected kind={} error={}",
                    request.kind(),
                    err
                );
                return Err(err);
            }
        };

        debug!(
            "event=activity_create module=store status=ok kind={} id={} count={}",
            activity.kind(),
            activity.id(),
            self.activities.len() + 1
        );

        let index = self.activities.len();
        self.activities.push(activity);
        Ok(&self.activities[index])
    }

    /// Returns the first activity with `id`, or `None` when absent.
    pub fn find_by_id(&self, id: &str) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|activity| activity.id().as_str() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Activity> {
        self.activities
            .iter_mut()
            .find(|activity| activity.id().as_str() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Activity> {
        self.activities.iter()
    }

    pub fn as_slice(&self) -> &[Activity] {
        self.activities.as_slice()
    }

    pub fn last(&self) -> Option<&Activity> {
        self.activities.last()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Replaces the whole collection, keeping the given order.
    pub fn replace_all(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
    }

    /// Removes the most recently appended activity.
    pub fn pop_last(&mut self) -> Option<Activity> {
        self.activities.pop()
    }

    pub fn clear(&mut self) {
        self.activities.clear();
    }
}
