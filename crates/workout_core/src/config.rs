//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Collect storage, map and logging settings with sensible defaults.
//! - Read overrides from `WORKOUT_*` environment variables.
//!
//! # Invariants
//! - A config that loaded successfully always has a non-empty storage key,
//!   a zoom level in `0..=20` and a finite, non-negative pan duration.

use crate::logging::default_log_level;
use crate::model::activity::Coordinates;
use crate::presentation::capability::PanOptions;
use crate::presentation::coordinator::{ViewSettings, DEFAULT_MAP_ZOOM, DEFAULT_PAN_DURATION_SECS};
use crate::repo::activity_repo::DEFAULT_STORAGE_KEY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_STORAGE_KEY: &str = "WORKOUT_STORAGE_KEY";
pub const ENV_DB_PATH: &str = "WORKOUT_DB_PATH";
pub const ENV_MAP_ZOOM: &str = "WORKOUT_MAP_ZOOM";
pub const ENV_PAN_DURATION_SECS: &str = "WORKOUT_PAN_DURATION_SECS";
pub const ENV_LOG_LEVEL: &str = "WORKOUT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "WORKOUT_LOG_DIR";
pub const ENV_HOME_LAT: &str = "WORKOUT_HOME_LAT";
pub const ENV_HOME_LNG: &str = "WORKOUT_HOME_LNG";

const DEFAULT_DB_FILE: &str = "workouts.db";
const MAX_MAP_ZOOM: u8 = 20;

/// Configuration error naming the offending variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { var: &'static str, value: String },
    /// Only one of the two home coordinates was provided.
    IncompleteHomePosition,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, value } => write!(f, "invalid value for {var}: `{value}`"),
            Self::IncompleteHomePosition => write!(
                f,
                "{ENV_HOME_LAT} and {ENV_HOME_LNG} must be set together"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Host configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub storage_key: String,
    pub db_path: PathBuf,
    pub map_zoom_level: u8,
    pub pan_duration_secs: f64,
    pub log_level: String,
    /// Absolute directory for rolling log files; logging is off when unset.
    pub log_dir: Option<PathBuf>,
    /// Fixed position used by hosts without a live geolocation source.
    pub home_position: Option<Coordinates>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            map_zoom_level: DEFAULT_MAP_ZOOM,
            pan_duration_secs: DEFAULT_PAN_DURATION_SECS,
            log_level: default_log_level().to_string(),
            log_dir: None,
            home_position: None,
        }
    }
}

impl CoreConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads overrides through `lookup`; unset or blank values keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &'static str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(key) = read(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(value) = read(ENV_MAP_ZOOM) {
            config.map_zoom_level = value
                .parse::<u8>()
                .ok()
                .filter(|zoom| *zoom <= MAX_MAP_ZOOM)
                .ok_or(ConfigError::InvalidValue {
                    var: ENV_MAP_ZOOM,
                    value,
                })?;
        }
        if let Some(value) = read(ENV_PAN_DURATION_SECS) {
            config.pan_duration_secs = value
                .parse::<f64>()
                .ok()
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .ok_or(ConfigError::InvalidValue {
                    var: ENV_PAN_DURATION_SECS,
                    value,
                })?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        config.home_position = match (read(ENV_HOME_LAT), read(ENV_HOME_LNG)) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(
                parse_degrees(ENV_HOME_LAT, lat, 90.0)?,
                parse_degrees(ENV_HOME_LNG, lng, 180.0)?,
            )),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteHomePosition),
        };

        Ok(config)
    }

    /// Map settings for `PresentationCoordinator`.
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            zoom_level: self.map_zoom_level,
            pan: PanOptions {
                animate: true,
                duration_secs: self.pan_duration_secs,
            },
        }
    }
}

fn parse_degrees(var: &'static str, value: String, limit: f64) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|degrees| degrees.is_finite() && degrees.abs() <= limit)
        .ok_or(ConfigError::InvalidValue { var, value })
}
