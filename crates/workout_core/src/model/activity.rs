//! Activity domain model.
//!
//! # Responsibility
//! - Define the canonical record for paced and elevation activities.
//! - Validate numeric inputs before anything is constructed.
//! - Derive pace/speed and the display label exactly once.
//!
//! # Invariants
//! - `distance_km` and `duration_min` are finite and strictly positive.
//! - Paced cadence is finite and strictly positive.
//! - Elevation gain is finite; it is not required to be positive.
//! - Inputs, derived metrics, `id` and `label` never change after
//!   construction. `interaction_count` is the only mutable field.

use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Month names used by activity labels, indexed from January.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// User-facing message for any rejected numeric input.
pub const VALIDATION_ALERT: &str = "Inputs have to be positive numbers!";

const ID_DIGITS: usize = 10;

/// Timestamp-derived activity identity.
///
/// Holds the last ten decimal digits of the creation instant in epoch
/// milliseconds. Two activities created within the same millisecond share
/// an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    /// Derives the id for an activity created at `timestamp`.
    pub fn from_timestamp(timestamp: DateTime<Utc>) -> Self {
        let millis = timestamp.timestamp_millis().to_string();
        let start = millis.len().saturating_sub(ID_DIGITS);
        Self(millis[start..].to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ActivityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for ActivityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ActivityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Geographic position as `(latitude, longitude)` in degrees.
///
/// Serialized as a two-element `[lat, lng]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.latitude, value.longitude]
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.latitude, self.longitude)
    }
}

/// Activity discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Distance-paced activity measured by pace and step cadence.
    Paced,
    /// Elevation-based activity measured by speed and climb.
    Elevation,
}

impl ActivityKind {
    /// Stable lowercase name used on the wire and in form input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paced => "paced",
            Self::Elevation => "elevation",
        }
    }

    /// Parses a stable lowercase kind name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "paced" => Some(Self::Paced),
            "elevation" => Some(Self::Elevation),
            _ => None,
        }
    }

    /// Kind name with its first letter capitalized, e.g. `Paced`.
    pub fn display_name(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific inputs and the metric derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityMetrics {
    Paced {
        cadence_spm: f64,
        /// `duration_min / distance_km`.
        pace_min_per_km: f64,
    },
    Elevation {
        elevation_gain_m: f64,
        /// `distance_km / (duration_min / 60)`.
        speed_km_per_h: f64,
    },
}

impl ActivityMetrics {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Self::Paced { .. } => ActivityKind::Paced,
            Self::Elevation { .. } => ActivityKind::Elevation,
        }
    }
}

/// Kind-specific creation input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewActivityDetails {
    Paced { cadence_spm: f64 },
    Elevation { elevation_gain_m: f64 },
}

/// Creation request for one activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewActivity {
    pub coordinates: Coordinates,
    pub distance_km: f64,
    pub duration_min: f64,
    pub details: NewActivityDetails,
}

impl NewActivity {
    pub fn paced(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Self {
        Self {
            coordinates,
            distance_km,
            duration_min,
            details: NewActivityDetails::Paced { cadence_spm },
        }
    }

    pub fn elevation(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self {
            coordinates,
            distance_km,
            duration_min,
            details: NewActivityDetails::Elevation { elevation_gain_m },
        }
    }

    pub fn kind(&self) -> ActivityKind {
        match self.details {
            NewActivityDetails::Paced { .. } => ActivityKind::Paced,
            NewActivityDetails::Elevation { .. } => ActivityKind::Elevation,
        }
    }

    /// Checks the numeric input policy without constructing anything.
    ///
    /// All inputs, coordinates included, must be finite. Distance, duration
    /// and cadence must also be
    /// strictly positive; elevation gain is exempt from the positivity check.
    ///
    /// # Errors
    /// - `NonFinite` for the first NaN/infinite input.
    /// - `NonPositive` for the first input that must be `> 0` but is not.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        let kind_field = match self.details {
            NewActivityDetails::Paced { cadence_spm } => ("cadence_spm", cadence_spm),
            NewActivityDetails::Elevation { elevation_gain_m } => {
                ("elevation_gain_m", elevation_gain_m)
            }
        };

        for (field, value) in [
            ("latitude", self.coordinates.latitude),
            ("longitude", self.coordinates.longitude),
            ("distance_km", self.distance_km),
            ("duration_min", self.duration_min),
            kind_field,
        ] {
            require_finite(field, value)?;
        }

        require_positive("distance_km", self.distance_km)?;
        require_positive("duration_min", self.duration_min)?;
        if let NewActivityDetails::Paced { cadence_spm } = self.details {
            require_positive("cadence_spm", cadence_spm)?;
        }

        Ok(())
    }
}

/// Validation error for activity inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityValidationError {
    /// Input is NaN or infinite.
    NonFinite { field: &'static str, value: f64 },
    /// Input must be strictly greater than zero.
    NonPositive { field: &'static str, value: f64 },
    /// Kind name is not one of the supported kinds.
    UnknownKind(String),
}

impl ActivityValidationError {
    /// Message shown to the user when creation is rejected.
    pub fn user_message(&self) -> &'static str {
        VALIDATION_ALERT
    }
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { field, value } => {
                write!(f, "{field} must be a finite number, got {value}")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be greater than zero, got {value}")
            }
            Self::UnknownKind(value) => write!(f, "unknown activity kind: `{value}`"),
        }
    }
}

impl Error for ActivityValidationError {}

fn require_finite(field: &'static str, value: f64) -> Result<(), ActivityValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ActivityValidationError::NonFinite { field, value })
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ActivityValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ActivityValidationError::NonPositive { field, value })
    }
}

/// One logged exercise activity.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    id: ActivityId,
    timestamp: DateTime<Utc>,
    coordinates: Coordinates,
    distance_km: f64,
    duration_min: f64,
    metrics: ActivityMetrics,
    label: String,
    interaction_count: u32,
}

impl Activity {
    /// Creates a paced activity stamped with the current time.
    pub fn paced(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Result<Self, ActivityValidationError> {
        Self::new(
            NewActivity::paced(coordinates, distance_km, duration_min, cadence_spm),
            Utc::now(),
        )
    }

    /// Creates an elevation activity stamped with the current time.
    pub fn elevation(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, ActivityValidationError> {
        Self::new(
            NewActivity::elevation(coordinates, distance_km, duration_min, elevation_gain_m),
            Utc::now(),
        )
    }

    /// Validates `request` and builds the activity created at `timestamp`.
    ///
    /// Derived metric, label and id are fixed here and never recomputed.
    pub fn new(
        request: NewActivity,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ActivityValidationError> {
        request.validate()?;

        let metrics = match request.details {
            NewActivityDetails::Paced { cadence_spm } => ActivityMetrics::Paced {
                cadence_spm,
                pace_min_per_km: request.duration_min / request.distance_km,
            },
            NewActivityDetails::Elevation { elevation_gain_m } => ActivityMetrics::Elevation {
                elevation_gain_m,
                speed_km_per_h: request.distance_km / (request.duration_min / 60.0),
            },
        };

        Ok(Self {
            id: ActivityId::from_timestamp(timestamp),
            timestamp,
            coordinates: request.coordinates,
            distance_km: request.distance_km,
            duration_min: request.duration_min,
            label: format_label(metrics.kind(), timestamp),
            metrics,
            interaction_count: 0,
        })
    }

    /// Rebuilds an activity from already-derived persisted values.
    ///
    /// Nothing is recomputed; callers must have validated the inputs.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_stored_parts(
        id: ActivityId,
        timestamp: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        metrics: ActivityMetrics,
        label: String,
        interaction_count: u32,
    ) -> Self {
        Self {
            id,
            timestamp,
            coordinates,
            distance_km,
            duration_min,
            metrics,
            label,
            interaction_count,
        }
    }

    pub fn id(&self) -> &ActivityId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn kind(&self) -> ActivityKind {
        self.metrics.kind()
    }

    pub fn metrics(&self) -> ActivityMetrics {
        self.metrics
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn interaction_count(&self) -> u32 {
        self.interaction_count
    }

    /// Pace in min/km for paced activities.
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.metrics {
            ActivityMetrics::Paced {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            ActivityMetrics::Elevation { .. } => None,
        }
    }

    /// Speed in km/h for elevation activities.
    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.metrics {
            ActivityMetrics::Elevation { speed_km_per_h, .. } => Some(speed_km_per_h),
            ActivityMetrics::Paced { .. } => None,
        }
    }

    /// Headline metric: pace for paced activities, speed for elevation ones.
    pub fn metric_value(&self) -> f64 {
        match self.metrics {
            ActivityMetrics::Paced {
                pace_min_per_km, ..
            } => pace_min_per_km,
            ActivityMetrics::Elevation { speed_km_per_h, .. } => speed_km_per_h,
        }
    }

    /// Records one explicit selection of this activity.
    pub fn record_interaction(&mut self) {
        self.interaction_count = self.interaction_count.saturating_add(1);
    }
}

/// Builds the `"<Kind> on <Month> <Day>"` label in local calendar time.
pub fn format_label(kind: ActivityKind, timestamp: DateTime<Utc>) -> String {
    let local = timestamp.with_timezone(&Local);
    format!(
        "{} on {} {}",
        kind.display_name(),
        MONTH_NAMES[local.month0() as usize],
        local.day()
    )
}
