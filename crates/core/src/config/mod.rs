use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PluckyError, Result};

/// Tunables for a single underline.
///
/// Keys use the same kebab-case names as the element attributes so a JSON
/// file and an attribute list describe the same thing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PluckConfig {
    /// Peak wave amplitude in the host length unit (em).
    pub amplitude: f64,
    /// Number of half wavelengths spanning the underline.
    pub num_half_waves: u32,
    /// Duration of the pull (pointer enter), in milliseconds.
    pub pull_duration: f64,
    /// Duration of the release (pointer leave), in milliseconds.
    pub release_duration: f64,
    /// Oscillation cycles completed by the release before it is fully damped.
    pub decay_freq: f64,
}

impl Default for PluckConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.3,
            num_half_waves: 4,
            pull_duration: 120.0,
            release_duration: 3500.0,
            decay_freq: 8.0,
        }
    }
}

impl PluckConfig {
    /// Names accepted by [`PluckConfig::apply_attribute`].
    pub const ATTRIBUTES: [&'static str; 5] = [
        "amplitude",
        "num-half-waves",
        "pull-duration",
        "release-duration",
        "decay-freq",
    ];

    /// Checks every field against the ranges the engine assumes. The engine
    /// itself never validates, so anything handed to a controller should pass
    /// through here first.
    pub fn validate(&self) -> Result<()> {
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(PluckyError::InvalidConfig {
                field: "amplitude",
                reason: "must be a finite number >= 0",
            });
        }
        if self.num_half_waves == 0 {
            return Err(PluckyError::InvalidConfig {
                field: "num-half-waves",
                reason: "must be at least 1",
            });
        }
        positive("pull-duration", self.pull_duration)?;
        positive("release-duration", self.release_duration)?;
        positive("decay-freq", self.decay_freq)?;
        Ok(())
    }

    /// Applies a single `name="value"` attribute. Returns `true` when the
    /// stored value actually changed.
    pub fn apply_attribute(&mut self, name: &str, value: &str) -> Result<bool> {
        let mut next = self.clone();
        match name {
            "amplitude" => next.amplitude = parse_number(name, value)?,
            "num-half-waves" => {
                let parsed = parse_number(name, value)?;
                if parsed < 1.0 || parsed.fract() != 0.0 || parsed > f64::from(u32::MAX) {
                    return Err(PluckyError::InvalidConfig {
                        field: "num-half-waves",
                        reason: "must be a positive integer",
                    });
                }
                next.num_half_waves = parsed as u32;
            }
            "pull-duration" => next.pull_duration = parse_number(name, value)?,
            "release-duration" => next.release_duration = parse_number(name, value)?,
            "decay-freq" => next.decay_freq = parse_number(name, value)?,
            _ => return Err(PluckyError::UnknownAttribute(name.to_string())),
        }
        next.validate()?;

        let changed = next != *self;
        if changed {
            tracing::debug!(name, value, "configuration attribute changed");
            *self = next;
        }
        Ok(changed)
    }

    /// Parses and validates a JSON document. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PluckyError::InvalidConfig {
            field,
            reason: "must be a finite number > 0",
        })
    }
}

fn parse_number(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| PluckyError::InvalidNumber {
            name: name.to_string(),
            value: value.to_string(),
        })
}
