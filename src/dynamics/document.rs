//! Hinge document format.
//!
//! ```json
//! { "hinges": [
//!   { "type": "propeller", "name": "prop", "propeller": "Propeller",
//!     "point": { "x": 0.0, "y": 0.0, "z": -1.0 }, "upm": 240.0 }
//! ] }
//! ```
//!
//! Canonical keys are always written. Older documents used `object`/`back`
//! for propellers and `leftCenter` for the wheel front point; those keys are
//! still accepted when reading.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A point stored as `{ "x", "y", "z" }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Root object of a hinge file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HingeDocument {
    pub hinges: Vec<HingeRecord>,
}

/// One hinge entry, dispatched on its `type` tag.
///
/// Only the tag is mandatory. Missing node names read as empty and missing
/// points as the origin, so an incomplete entry fails to resolve on its own
/// instead of rejecting the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HingeRecord {
    Door(DoorRecord),
    Propeller(PropellerRecord),
    Wheel(WheelRecord),
}

impl HingeRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Door(r) => &r.name,
            Self::Propeller(r) => &r.name,
            Self::Wheel(r) => &r.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoorRecord {
    pub name: String,
    pub anchor: String,
    pub element: String,
    /// Anchor-local hinge line endpoints
    pub point1: Point3,
    pub point2: Point3,
    pub angle_limit: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upm: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropellerRecord {
    pub name: String,
    #[serde(alias = "object")]
    pub propeller: String,
    /// Propeller-local reference point
    #[serde(alias = "back")]
    pub point: Point3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upm: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WheelRecord {
    pub name: String,
    pub parent: String,
    pub left: String,
    pub right: String,
    /// Parent-local forward reference point
    #[serde(alias = "leftCenter")]
    pub front: Point3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upm: Option<f32>,
}
