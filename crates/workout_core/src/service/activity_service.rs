//! Activity use-case service.
//!
//! # Responsibility
//! - Create activities and persist the full collection after each success.
//! - Rehydrate the collection from durable state at startup.
//! - Reset memory and durable state together.
//!
//! # Invariants
//! - `create` applies fully or not at all: when the save fails, the new
//!   activity is removed again before the error is returned.
//! - Only `create` writes the slot.

use crate::model::activity::{Activity, ActivityValidationError, NewActivity};
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::slot_repo::{RepoError, RepoResult, SlotRepository};
use crate::store::activity_store::ActivityStore;
use chrono::{DateTime, Utc};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for activity use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Inputs rejected; nothing changed.
    Validation(ActivityValidationError),
    /// Durable write failed; the in-memory append was rolled back.
    Persistence(RepoError),
    /// Internal consistency mismatch between append and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "failed to persist activities: {err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent activity state: {details}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<ActivityValidationError> for ServiceError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Owns the session collection and its persistence adapter.
pub struct ActivityService<S: SlotRepository> {
    store: ActivityStore,
    repo: ActivityRepository<S>,
}

impl<S: SlotRepository> ActivityService<S> {
    /// Starts with an empty collection; call `rehydrate` to load state.
    pub fn new(repo: ActivityRepository<S>) -> Self {
        Self {
            store: ActivityStore::new(),
            repo,
        }
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// Returns the number of restored activities. On error the current
    /// collection is left as it was.
    pub fn rehydrate(&mut self) -> RepoResult<usize> {
        let restored = self.repo.load()?;
        let count = restored.len();
        self.store.replace_all(restored);
        info!("event=activities_rehydrate module=service status=ok count={count}");
        Ok(count)
    }

    /// Creates an activity stamped now and saves the collection.
    pub fn create(&mut self, request: NewActivity) -> ServiceResult<&Activity> {
        self.create_at(request, Utc::now())
    }

    /// Creates an activity created at `timestamp` and saves the collection.
    ///
    /// # Errors
    /// - `Validation` when inputs are rejected; nothing changes.
    /// - `Persistence` when the save fails; the append is undone.
    pub fn create_at(
        &mut self,
        request: NewActivity,
        timestamp: DateTime<Utc>,
    ) -> ServiceResult<&Activity> {
        self.store.create_at(request, timestamp)?;

        if let Err(err) = self.repo.save(self.store.as_slice()) {
            self.store.pop_last();
            error!(
                "event=activity_create module=service status=error error_code=save_failed error={err}"
            );
            return Err(err.into());
        }

        self.store
            .last()
            .ok_or(ServiceError::InconsistentState("created activity missing"))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Activity> {
        self.store.find_by_id(id)
    }

    /// Increments the interaction count of `id`.
    ///
    /// Returns the new count, or `None` when the id is unknown. The change
    /// stays in memory until the next save.
    pub fn record_interaction(&mut self, id: &str) -> Option<u32> {
        let activity = self.store.find_by_id_mut(id)?;
        activity.record_interaction();
        Some(activity.interaction_count())
    }

    pub fn activities(&self) -> &[Activity] {
        self.store.as_slice()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Erases durable state, then clears the in-memory collection.
    ///
    /// When the erase fails the collection is kept.
    pub fn reset_all(&mut self) -> RepoResult<()> {
        self.repo.erase()?;
        let dropped = self.store.len();
        self.store.clear();
        info!("event=activities_reset module=service status=ok dropped={dropped}");
        Ok(())
    }

    pub fn repository(&self) -> &ActivityRepository<S> {
        &self.repo
    }
}
