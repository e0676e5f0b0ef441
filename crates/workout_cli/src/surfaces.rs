//! Terminal stand-ins for the map, list, form and alert surfaces.

use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;
use workout_core::{
    ActivityKind, ActivityListSurface, ActivityView, Coordinates, EntryFormSurface,
    GeolocationError, GeolocationSource, MapSurface, Notifier, PanOptions, Surfaces,
};

/// Geolocation backed by configuration instead of a device sensor.
pub struct ConfiguredPosition(pub Option<Coordinates>);

impl GeolocationSource for ConfiguredPosition {
    fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.0.ok_or_else(|| {
            GeolocationError::Unavailable("no home position configured".to_string())
        })
    }
}

/// Shared handle; list entries are buffered so commands decide what to print.
#[derive(Clone, Default)]
pub struct TerminalSurfaces {
    list: Rc<RefCell<Vec<String>>>,
}

impl TerminalSurfaces {
    pub fn surfaces(&self) -> Surfaces {
        Surfaces {
            map: Box::new(self.clone()),
            list: Box::new(self.clone()),
            form: Box::new(self.clone()),
            notifier: Box::new(self.clone()),
        }
    }

    pub fn list_lines(&self) -> Vec<String> {
        self.list.borrow().clone()
    }
}

fn format_entry(view: &ActivityView) -> String {
    format!(
        "{id}  {label:<22} {distance} km  {duration} min  {metric:.1} {metric_unit}  {detail} {detail_unit}",
        id = view.id,
        label = view.label,
        distance = view.distance_km,
        duration = view.duration_min,
        metric = view.metric_value,
        metric_unit = view.metric_unit(),
        detail = view.detail_value,
        detail_unit = view.detail_unit(),
    )
}

impl MapSurface for TerminalSurfaces {
    fn initialize(&mut self, center: Coordinates, zoom_level: u8) {
        info!("event=map_init module=cli status=ok center={center} zoom={zoom_level}");
    }

    fn add_marker(&mut self, activity: &ActivityView) {
        debug!(
            "event=map_marker module=cli status=ok id={} class={} at={}",
            activity.id,
            activity.style_class(),
            activity.coordinates
        );
    }

    fn set_view(&mut self, center: Coordinates, zoom_level: u8, pan: PanOptions) {
        println!(
            "map -> {center} zoom {zoom_level} (animate={}, {}s)",
            pan.animate, pan.duration_secs
        );
    }
}

impl ActivityListSurface for TerminalSurfaces {
    fn add_entry(&mut self, activity: &ActivityView) {
        self.list.borrow_mut().push(format_entry(activity));
    }
}

impl EntryFormSurface for TerminalSurfaces {
    fn show(&mut self) {
        debug!("event=form_show module=cli status=ok");
    }

    fn clear_and_hide(&mut self) {
        debug!("event=form_hide module=cli status=ok");
    }

    fn show_kind_fields(&mut self, kind: ActivityKind) {
        debug!("event=form_kind module=cli status=ok kind={kind}");
    }
}

impl Notifier for TerminalSurfaces {
    fn alert(&mut self, message: &str) {
        eprintln!("! {message}");
    }
}
