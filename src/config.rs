//! Dynamics Configuration
//!
//! Per-kind defaults applied when hinges are created or loaded without an
//! explicit rate or limit.
//!
//! ```rust,ignore
//! use myth_dynamics::{Dynamics, DynamicsConfig};
//!
//! let config = DynamicsConfig {
//!     propeller_upm: 600.0,
//!     ..Default::default()
//! };
//! let dynamics = Dynamics::with_config(config);
//! ```

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default settings used by the [`Dynamics`](crate::Dynamics) registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DynamicsConfig {
    /// Rotation rate of newly created propellers, in units per minute.
    pub propeller_upm: f32,

    /// Rotation rate of newly created wheel pairs, in units per minute.
    pub wheel_upm: f32,

    /// Rotation rate used when a door is fast-forwarded by name.
    pub door_upm: f32,

    /// Swing limit (radians) of doors created through
    /// [`Dynamics::create_door_hinge`](crate::Dynamics::create_door_hinge).
    pub door_angle_limit: f32,

    /// "Up" direction in the wheel parent's local frame.
    ///
    /// Used to tell the left side of a vehicle from the right side.
    pub up_axis: Vec3,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            propeller_upm: 240.0,
            wheel_upm: 100.0,
            door_upm: 60.0,
            door_angle_limit: FRAC_PI_2 * 0.8,
            up_axis: Vec3::Z,
        }
    }
}

impl DynamicsConfig {
    /// Parses a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
