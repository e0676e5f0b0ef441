//! Event-driven coordinator between the activity service and surfaces.
//!
//! # Responsibility
//! - Run the startup sequence: geolocation, persistence load, rendering.
//! - Turn map clicks, form submits, kind toggles and list selections into
//!   service calls and render requests.
//!
//! # Invariants
//! - Every handler runs to completion; nothing is queued or retried.
//! - A successful submit requests exactly one marker and one list entry.
//! - Map requests are only issued once the map is initialized.

use crate::model::activity::{ActivityId, ActivityKind, ActivityValidationError, Coordinates};
use crate::presentation::capability::{
    ActivityListSurface, EntryFormSurface, GeolocationSource, MapSurface, Notifier, PanOptions,
    GEOLOCATION_ALERT, SAVE_ALERT,
};
use crate::presentation::form::FormSubmission;
use crate::presentation::view::ActivityView;
use crate::repo::slot_repo::{RepoError, RepoResult, SlotRepository};
use crate::service::activity_service::{ActivityService, ServiceError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default map zoom level.
pub const DEFAULT_MAP_ZOOM: u8 = 13;
/// Default re-centering animation length.
pub const DEFAULT_PAN_DURATION_SECS: f64 = 1.0;

/// Map presentation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub zoom_level: u8,
    pub pan: PanOptions,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_MAP_ZOOM,
            pan: PanOptions {
                animate: true,
                duration_secs: DEFAULT_PAN_DURATION_SECS,
            },
        }
    }
}

/// External surfaces driven by the coordinator.
pub struct Surfaces {
    pub map: Box<dyn MapSurface>,
    pub list: Box<dyn ActivityListSurface>,
    pub form: Box<dyn EntryFormSurface>,
    pub notifier: Box<dyn Notifier>,
}

/// Outcome of the startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupSummary {
    pub map_ready: bool,
    pub restored: usize,
    /// `true` when stored data existed but could not be read.
    pub load_failed: bool,
}

/// Submit failure.
#[derive(Debug)]
pub enum SubmitError {
    /// No map click has supplied coordinates yet.
    CreationBlocked,
    Validation(ActivityValidationError),
    Persistence(RepoError),
    InconsistentState(&'static str),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreationBlocked => {
                write!(f, "no map position selected; click the map before submitting")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "failed to persist activities: {err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent activity state: {details}")
            }
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::CreationBlocked | Self::InconsistentState(_) => None,
        }
    }
}

impl From<ServiceError> for SubmitError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => Self::Validation(err),
            ServiceError::Persistence(err) => Self::Persistence(err),
            ServiceError::InconsistentState(details) => Self::InconsistentState(details),
        }
    }
}

/// Session controller owning the activity service and the surfaces.
pub struct PresentationCoordinator<S: SlotRepository> {
    service: ActivityService<S>,
    surfaces: Surfaces,
    settings: ViewSettings,
    map_ready: bool,
    pending_click: Option<Coordinates>,
}

impl<S: SlotRepository> PresentationCoordinator<S> {
    pub fn new(service: ActivityService<S>, surfaces: Surfaces, settings: ViewSettings) -> Self {
        Self {
            service,
            surfaces,
            settings,
            map_ready: false,
            pending_click: None,
        }
    }

    /// Runs the startup sequence: geolocation, then load, then rendering.
    ///
    /// Restored activities get a list entry each, and a marker each when
    /// the map is ready, in collection order. Unreadable stored data is
    /// logged and the session starts empty.
    pub fn start(&mut self, geolocation: &dyn GeolocationSource) -> StartupSummary {
        self.locate(geolocation);

        let load_failed = match self.service.rehydrate() {
            Ok(_) => false,
            Err(err) => {
                error!(
                    "event=startup_load module=presentation status=error error_code=load_failed error={err}"
                );
                true
            }
        };

        for view in self.views() {
            if self.map_ready {
                self.surfaces.map.add_marker(&view);
            }
            self.surfaces.list.add_entry(&view);
        }

        let summary = StartupSummary {
            map_ready: self.map_ready,
            restored: self.service.len(),
            load_failed,
        };
        info!(
            "event=startup module=presentation status=ok map_ready={} restored={} load_failed={}",
            summary.map_ready, summary.restored, summary.load_failed
        );
        summary
    }

    /// Retries geolocation after an earlier failure.
    ///
    /// On success the map is initialized and every activity already in the
    /// collection gets its marker. Returns whether the map is ready.
    pub fn retry_geolocation(&mut self, geolocation: &dyn GeolocationSource) -> bool {
        if self.map_ready {
            return true;
        }
        if self.locate(geolocation) {
            for view in self.views() {
                self.surfaces.map.add_marker(&view);
            }
        }
        self.map_ready
    }

    /// Remembers the clicked position and opens the entry form.
    ///
    /// Ignored while the map is not initialized.
    pub fn on_map_click(&mut self, coordinates: Coordinates) {
        if !self.map_ready {
            debug!("event=map_click module=presentation status=ignored reason=map_not_ready");
            return;
        }
        self.pending_click = Some(coordinates);
        self.surfaces.form.show();
    }

    /// Switches the visible kind-specific form input.
    pub fn on_kind_toggled(&mut self, kind: ActivityKind) {
        self.surfaces.form.show_kind_fields(kind);
    }

    /// Creates an activity from the entry form at the last clicked position.
    ///
    /// On success the new activity is rendered once on the map and once in
    /// the list, and the form is cleared and hidden. Validation and save
    /// failures are alerted to the user and change nothing; the clicked
    /// position is kept so the entry can be resubmitted.
    pub fn on_form_submitted(
        &mut self,
        submission: &FormSubmission,
    ) -> Result<ActivityId, SubmitError> {
        let Some(coordinates) = self.pending_click else {
            warn!("event=form_submit module=presentation status=blocked reason=no_map_click");
            return Err(SubmitError::CreationBlocked);
        };

        let created = submission
            .to_request(coordinates)
            .map_err(ServiceError::from)
            .and_then(|request| self.service.create(request).map(ActivityView::from));

        let view = match created {
            Ok(view) => view,
            Err(ServiceError::Validation(err)) => {
                self.surfaces.notifier.alert(err.user_message());
                return Err(SubmitError::Validation(err));
            }
            Err(err) => {
                warn!("event=form_submit module=presentation status=error error={err}");
                self.surfaces.notifier.alert(SAVE_ALERT);
                return Err(err.into());
            }
        };

        self.surfaces.map.add_marker(&view);
        self.surfaces.list.add_entry(&view);
        self.surfaces.form.clear_and_hide();
        self.pending_click = None;

        info!(
            "event=form_submit module=presentation status=ok kind={} id={}",
            view.kind, view.id
        );
        Ok(view.id)
    }

    /// Re-centers the map on the selected list item's activity.
    ///
    /// Dropped silently when the map is not ready or the id is unknown.
    /// Returns whether the map was re-centered.
    pub fn on_list_item_selected(&mut self, id: &str) -> bool {
        if !self.map_ready {
            debug!("event=list_select module=presentation status=dropped reason=map_not_ready");
            return false;
        }
        let Some(coordinates) = self
            .service
            .find_by_id(id)
            .map(|activity| activity.coordinates())
        else {
            debug!("event=list_select module=presentation status=ignored reason=unknown_id id={id}");
            return false;
        };

        self.surfaces
            .map
            .set_view(coordinates, self.settings.zoom_level, self.settings.pan);
        self.service.record_interaction(id);
        true
    }

    /// Clears the collection and its durable state.
    pub fn reset_all(&mut self) -> RepoResult<()> {
        self.pending_click = None;
        self.service.reset_all()
    }

    /// Position remembered from the last map click, if any.
    pub fn pending_click(&self) -> Option<Coordinates> {
        self.pending_click
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn service(&self) -> &ActivityService<S> {
        &self.service
    }

    fn locate(&mut self, geolocation: &dyn GeolocationSource) -> bool {
        match geolocation.current_position() {
            Ok(center) => {
                self.surfaces
                    .map
                    .initialize(center, self.settings.zoom_level);
                self.map_ready = true;
                info!("event=geolocation module=presentation status=ok");
            }
            Err(err) => {
                warn!("event=geolocation module=presentation status=error error={err}");
                self.surfaces.notifier.alert(GEOLOCATION_ALERT);
            }
        }
        self.map_ready
    }

    fn views(&self) -> Vec<ActivityView> {
        self.service
            .activities()
            .iter()
            .map(ActivityView::from)
            .collect()
    }
}
