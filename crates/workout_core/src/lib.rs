//! Core domain logic for the workout log.
//! This crate is the single source of truth for activity invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::activity::{
    Activity, ActivityId, ActivityKind, ActivityMetrics, ActivityValidationError, Coordinates,
    NewActivity, NewActivityDetails, MONTH_NAMES, VALIDATION_ALERT,
};
pub use model::record::{ActivityRecord, RecordError};
pub use presentation::capability::{
    ActivityListSurface, EntryFormSurface, GeolocationError, GeolocationSource, MapSurface,
    Notifier, PanOptions, GEOLOCATION_ALERT, SAVE_ALERT,
};
pub use presentation::coordinator::{
    PresentationCoordinator, StartupSummary, SubmitError, Surfaces, ViewSettings,
};
pub use presentation::form::FormSubmission;
pub use presentation::view::ActivityView;
pub use repo::activity_repo::{ActivityRepository, DEFAULT_STORAGE_KEY};
pub use repo::slot_repo::{
    MemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
pub use service::activity_service::{ActivityService, ServiceError, ServiceResult};
pub use store::activity_store::ActivityStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
