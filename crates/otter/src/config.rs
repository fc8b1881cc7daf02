use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Nominal frame duration of a 60 Hz display.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Frame duration velocities are expressed in (pixels per nominal frame).
    pub nominal_frame_ms: f64,
    /// Upper bound on the per-frame time scale, so a frame after a long pause (hidden tab) does
    /// not teleport circles.
    pub max_delta_factor: f64,
    /// Diameter multiplier while the pointer is over a circle.
    pub hover_scale: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            nominal_frame_ms: NOMINAL_FRAME_MS,
            max_delta_factor: 2.0,
            hover_scale: 1.2,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("nominal_frame_ms", self.nominal_frame_ms),
            ("max_delta_factor", self.max_delta_factor),
            ("hover_scale", self.hover_scale),
        ];
        for (name, v) in checks {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a positive number, got {v}"),
                });
            }
        }
        Ok(())
    }
}
