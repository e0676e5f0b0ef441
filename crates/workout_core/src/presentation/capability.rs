//! Capability contracts for external collaborators.

use crate::model::activity::{ActivityKind, Coordinates};
use crate::presentation::view::ActivityView;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// User-facing message when the position cannot be resolved.
pub const GEOLOCATION_ALERT: &str = "Could not get your position";
/// User-facing message when a new activity cannot be saved.
pub const SAVE_ALERT: &str = "Could not save your workout";

/// Geolocation failure reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    PermissionDenied,
    Unavailable(String),
}

impl Display for GeolocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "geolocation permission denied"),
            Self::Unavailable(reason) => write!(f, "geolocation unavailable: {reason}"),
        }
    }
}

impl Error for GeolocationError {}

/// Source of the initial map center.
pub trait GeolocationSource {
    fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Animation options for re-centering the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration_secs: f64,
}

/// Interactive map with activity markers.
///
/// The host forwards clicks on an initialized map to
/// `PresentationCoordinator::on_map_click`.
pub trait MapSurface {
    fn initialize(&mut self, center: Coordinates, zoom_level: u8);
    fn add_marker(&mut self, activity: &ActivityView);
    fn set_view(&mut self, center: Coordinates, zoom_level: u8, pan: PanOptions);
}

/// Rendered activity list; items carry the activity id for selection.
pub trait ActivityListSurface {
    fn add_entry(&mut self, activity: &ActivityView);
}

/// Activity entry form.
pub trait EntryFormSurface {
    fn show(&mut self);
    fn clear_and_hide(&mut self);
    /// Shows the input belonging to `kind` and hides the other one.
    fn show_kind_fields(&mut self, kind: ActivityKind);
}

/// Blocking user-facing alerts.
pub trait Notifier {
    fn alert(&mut self, message: &str);
}
