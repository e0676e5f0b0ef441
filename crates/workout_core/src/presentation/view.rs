//! Render request payload for one activity.

use crate::model::activity::{Activity, ActivityId, ActivityKind, ActivityMetrics, Coordinates};

/// Complete data a surface needs to draw one activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityView {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub coordinates: Coordinates,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Pace (min/km) for paced activities, speed (km/h) for elevation ones.
    pub metric_value: f64,
    /// Cadence (spm) for paced activities, elevation gain (m) otherwise.
    pub detail_value: f64,
    pub label: String,
}

impl ActivityView {
    /// Popup style class, e.g. `paced-popup`.
    pub fn style_class(&self) -> String {
        format!("{}-popup", self.kind.as_str())
    }

    pub fn metric_unit(&self) -> &'static str {
        match self.kind {
            ActivityKind::Paced => "min/km",
            ActivityKind::Elevation => "km/h",
        }
    }

    pub fn detail_unit(&self) -> &'static str {
        match self.kind {
            ActivityKind::Paced => "spm",
            ActivityKind::Elevation => "m",
        }
    }
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        let (metric_value, detail_value) = match activity.metrics() {
            ActivityMetrics::Paced {
                cadence_spm,
                pace_min_per_km,
            } => (pace_min_per_km, cadence_spm),
            ActivityMetrics::Elevation {
                elevation_gain_m,
                speed_km_per_h,
            } => (speed_km_per_h, elevation_gain_m),
        };

        Self {
            id: activity.id().clone(),
            kind: activity.kind(),
            coordinates: activity.coordinates(),
            distance_km: activity.distance_km(),
            duration_min: activity.duration_min(),
            metric_value,
            detail_value,
            label: activity.label().to_string(),
        }
    }
}
