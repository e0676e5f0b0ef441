//! Plain-data activity record used by the persisted collection.
//!
//! # Responsibility
//! - Define the JSON shape of one stored activity.
//! - Convert between typed `Activity` values and plain records.
//!
//! # Invariants
//! - A record carries variant identity only through its `kind` field.
//! - Rebuilding an `Activity` branches on `kind` explicitly, keeps stored
//!   derived values as-is and rejects records whose kind-specific fields do
//!   not match the discriminant.

use crate::model::activity::{
    Activity, ActivityId, ActivityKind, ActivityMetrics, ActivityValidationError, Coordinates,
    NewActivity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stored attribute data of one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    /// RFC 3339 creation instant.
    pub timestamp: DateTime<Utc>,
    /// `[lat, lng]`.
    pub coords: Coordinates,
    pub distance_km: f64,
    pub duration_min: f64,
    pub kind: ActivityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence_spm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_km_per_h: Option<f64>,
    pub label: String,
    #[serde(default)]
    pub interaction_count: u32,
}

impl From<&Activity> for ActivityRecord {
    fn from(activity: &Activity) -> Self {
        let (cadence_spm, pace_min_per_km, elevation_gain_m, speed_km_per_h) =
            match activity.metrics() {
                ActivityMetrics::Paced {
                    cadence_spm,
                    pace_min_per_km,
                } => (Some(cadence_spm), Some(pace_min_per_km), None, None),
                ActivityMetrics::Elevation {
                    elevation_gain_m,
                    speed_km_per_h,
                } => (None, None, Some(elevation_gain_m), Some(speed_km_per_h)),
            };

        Self {
            id: activity.id().clone(),
            timestamp: activity.timestamp(),
            coords: activity.coordinates(),
            distance_km: activity.distance_km(),
            duration_min: activity.duration_min(),
            kind: activity.kind(),
            cadence_spm,
            pace_min_per_km,
            elevation_gain_m,
            speed_km_per_h,
            label: activity.label().to_string(),
            interaction_count: activity.interaction_count(),
        }
    }
}

/// Error raised when a stored record cannot become a typed activity.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A field required by the record's `kind` is absent.
    MissingField {
        id: ActivityId,
        field: &'static str,
    },
    /// A field belonging to the other kind is present.
    UnexpectedField {
        id: ActivityId,
        field: &'static str,
    },
    /// Stored inputs violate the activity input policy.
    Invalid {
        id: ActivityId,
        source: ActivityValidationError,
    },
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { id, field } => {
                write!(f, "activity record {id} is missing `{field}`")
            }
            Self::UnexpectedField { id, field } => {
                write!(f, "activity record {id} has `{field}` that does not match its kind")
            }
            Self::Invalid { id, source } => write!(f, "activity record {id} is invalid: {source}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl TryFrom<ActivityRecord> for Activity {
    type Error = RecordError;

    fn try_from(record: ActivityRecord) -> Result<Self, Self::Error> {
        let id = record.id.clone();
        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or_else(|| RecordError::MissingField {
                id: id.clone(),
                field,
            })
        };
        let forbid = |value: Option<f64>, field: &'static str| match value {
            Some(_) => Err(RecordError::UnexpectedField {
                id: id.clone(),
                field,
            }),
            None => Ok(()),
        };

        let (request, metrics) = match record.kind {
            ActivityKind::Paced => {
                forbid(record.elevation_gain_m, "elevation_gain_m")?;
                forbid(record.speed_km_per_h, "speed_km_per_h")?;
                let cadence_spm = require(record.cadence_spm, "cadence_spm")?;
                let pace_min_per_km = require(record.pace_min_per_km, "pace_min_per_km")?;
                (
                    NewActivity::paced(
                        record.coords,
                        record.distance_km,
                        record.duration_min,
                        cadence_spm,
                    ),
                    ActivityMetrics::Paced {
                        cadence_spm,
                        pace_min_per_km,
                    },
                )
            }
            ActivityKind::Elevation => {
                forbid(record.cadence_spm, "cadence_spm")?;
                forbid(record.pace_min_per_km, "pace_min_per_km")?;
                let elevation_gain_m = require(record.elevation_gain_m, "elevation_gain_m")?;
                let speed_km_per_h = require(record.speed_km_per_h, "speed_km_per_h")?;
                (
                    NewActivity::elevation(
                        record.coords,
                        record.distance_km,
                        record.duration_min,
                        elevation_gain_m,
                    ),
                    ActivityMetrics::Elevation {
                        elevation_gain_m,
                        speed_km_per_h,
                    },
                )
            }
        };

        request.validate().map_err(|source| RecordError::Invalid {
            id: id.clone(),
            source,
        })?;

        Ok(Activity::from_stored_parts(
            record.id,
            record.timestamp,
            record.coords,
            record.distance_km,
            record.duration_min,
            metrics,
            record.label,
            record.interaction_count,
        ))
    }
}
