//! On-disk format for the control configuration.
//!
//! Every field is optional; missing fields fall back to the defaults of
//! [`ControlConfig`]. Notification durations are written in seconds.

use farlink_core::config::{ControlConfig, HotkeyBinding, duration_secs_to_ms};
use farlink_core::fixed::Fixed64;
use serde::Deserialize;

/// A value that parsed but cannot be represented in a snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("max_ray_distance {distance} is out of range")]
    RayDistanceOutOfRange { distance: f64 },
}

/// Hotkey chords in a config file. Unset chords keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BindingsData {
    #[serde(default)]
    pub take_control: Option<HotkeyBinding>,
    #[serde(default)]
    pub cycle_power: Option<HotkeyBinding>,
    #[serde(default)]
    pub shutdown_power: Option<HotkeyBinding>,
    #[serde(default)]
    pub open_terminal: Option<HotkeyBinding>,
}

/// A control configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControlFile {
    #[serde(default)]
    pub bindings: BindingsData,
    #[serde(default)]
    pub recursive_search: Option<bool>,
    /// Failure notification display time, in seconds.
    #[serde(default)]
    pub urgent_duration: Option<f64>,
    /// Success notification display time, in seconds.
    #[serde(default)]
    pub minor_duration: Option<f64>,
    #[serde(default)]
    pub max_ray_distance: Option<f64>,
}

impl ControlFile {
    /// Resolve into a snapshot, clamping durations.
    ///
    /// Non-positive or non-finite ray distances keep the default; distances
    /// too large for [`Fixed64`] are rejected.
    pub fn into_config(self) -> Result<ControlConfig, SchemaError> {
        let mut config = ControlConfig::default();
        let bindings = self.bindings;
        if let Some(b) = bindings.take_control {
            config.take_control = b;
        }
        if let Some(b) = bindings.cycle_power {
            config.cycle_power = b;
        }
        if let Some(b) = bindings.shutdown_power {
            config.shutdown_power = b;
        }
        if let Some(b) = bindings.open_terminal {
            config.open_terminal = b;
        }
        if let Some(recursive) = self.recursive_search {
            config.recursive_search = recursive;
        }
        if let Some(secs) = self.urgent_duration {
            config.urgent_duration_ms = duration_secs_to_ms(secs);
        }
        if let Some(secs) = self.minor_duration {
            config.minor_duration_ms = duration_secs_to_ms(secs);
        }
        if let Some(distance) = self.max_ray_distance.filter(|d| d.is_finite() && *d > 0.0) {
            config.max_ray_distance = Fixed64::checked_from_num(distance)
                .ok_or(SchemaError::RayDistanceOutOfRange { distance })?;
        }
        Ok(config)
    }
}
