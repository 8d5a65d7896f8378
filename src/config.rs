//! Engine tuning knobs.
//!
//! Defaults come from [`crate::consts`]. A host may override them from a JSON
//! document ([`EngineConfig::from_json`]) or, for native harnesses, from
//! `COORDPICK_*` environment variables ([`EngineConfig::from_env`]).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_MARKERS, RENDER_INTERVAL_MS, TAP_MAX_DURATION_MS, TAP_MOVE_THRESHOLD_PX, ZOOM_STEP};
use crate::error::ConfigError;

/// Which conditions a released contact must meet to count as a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapPolicy {
    /// Movement within the threshold is enough; hold time is ignored.
    MovementOnly,
    /// Movement within the threshold and a short enough hold.
    #[default]
    MovementAndDuration,
}

impl FromStr for TapPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movement_only" => Ok(Self::MovementOnly),
            "movement_and_duration" => Ok(Self::MovementAndDuration),
            other => Err(ConfigError::Invalid { field: "tap_policy", reason: format!("unknown policy `{other}`") }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Contact movement, in screen pixels, beyond which a session pans.
    pub tap_move_threshold_px: f64,
    /// Longest hold, in milliseconds, that still counts as a tap.
    pub tap_max_duration_ms: f64,
    pub tap_policy: TapPolicy,
    /// Minimum spacing between throttled renders.
    pub render_interval_ms: f64,
    /// Factor applied by `zoom_in` / `zoom_out` and the `+` / `-` keys.
    pub zoom_step: f64,
    pub max_markers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tap_move_threshold_px: TAP_MOVE_THRESHOLD_PX,
            tap_max_duration_ms: TAP_MAX_DURATION_MS,
            tap_policy: TapPolicy::default(),
            render_interval_ms: RENDER_INTERVAL_MS,
            zoom_step: ZOOM_STEP,
            max_markers: MAX_MARKERS,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any parseable `COORDPICK_*` variables.
    ///
    /// Unparseable values fall back to the default; parseable but
    /// out-of-domain values are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            tap_move_threshold_px: env_parse("COORDPICK_TAP_MOVE_THRESHOLD_PX", defaults.tap_move_threshold_px),
            tap_max_duration_ms: env_parse("COORDPICK_TAP_MAX_DURATION_MS", defaults.tap_max_duration_ms),
            tap_policy: env_parse("COORDPICK_TAP_POLICY", defaults.tap_policy),
            render_interval_ms: env_parse("COORDPICK_RENDER_INTERVAL_MS", defaults.render_interval_ms),
            zoom_step: env_parse("COORDPICK_ZOOM_STEP", defaults.zoom_step),
            max_markers: env_parse("COORDPICK_MAX_MARKERS", defaults.max_markers),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and
    /// [`ConfigError::Invalid`] for out-of-domain values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tap_move_threshold_px", self.tap_move_threshold_px)?;
        positive("tap_max_duration_ms", self.tap_max_duration_ms)?;
        positive("render_interval_ms", self.render_interval_ms)?;
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::Invalid { field: "zoom_step", reason: format!("must be > 1.0, got {}", self.zoom_step) });
        }
        if self.max_markers == 0 {
            return Err(ConfigError::Invalid { field: "max_markers", reason: "must be at least 1".into() });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("must be a positive number, got {value}") })
    }
}

/// Read `key` from the environment, falling back to `default` when the variable
/// is absent or does not parse.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
