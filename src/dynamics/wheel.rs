use std::fmt;

use glam::Vec3;

use crate::config::DynamicsConfig;
use crate::dynamics::document::{HingeRecord, WheelRecord};
use crate::dynamics::hinge::{Articulation, Hinge, HingeKind, NodeRef, orbit_and_spin};
use crate::errors::Result;
use crate::scene::{NodeHandle, Scene};

/// Corner of the vehicle occupied by the left-labelled wheel of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelPosition {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl WheelPosition {
    #[must_use]
    pub fn new(is_front: bool, is_left: bool) -> Self {
        match (is_front, is_left) {
            (true, true) => Self::FrontLeft,
            (true, false) => Self::FrontRight,
            (false, true) => Self::BackLeft,
            (false, false) => Self::BackRight,
        }
    }

    #[must_use]
    pub fn is_front(self) -> bool {
        matches!(self, Self::FrontLeft | Self::FrontRight)
    }

    #[must_use]
    pub fn is_left(self) -> bool {
        matches!(self, Self::FrontLeft | Self::BackLeft)
    }
}

impl fmt::Display for WheelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FrontLeft => "FRONTLEFT",
            Self::FrontRight => "FRONTRIGHT",
            Self::BackLeft => "BACKLEFT",
            Self::BackRight => "BACKRIGHT",
        };
        f.write_str(s)
    }
}

/// Two wheels on a common axle rolling together.
///
/// Both wheels turn by the same rigid rotation about the line through their
/// centers. `dir` is chosen so that a positive angle rolls the pair toward
/// `front`, whichever corner of the parent body the pair occupies and however
/// the two wheels were labelled.
#[derive(Debug, Clone)]
pub struct WheelHinge {
    pub left_wheel: NodeRef,
    pub right_wheel: NodeRef,
    pub parent: NodeRef,

    /// Parent geometric center in parent-local space
    pub parent_center: Vec3,
    /// Wheel centers, each in its own wheel's local space
    pub left_center: Vec3,
    pub right_center: Vec3,
    /// Forward reference point in parent-local space
    pub front: Vec3,

    /// Spin axes, each in its own wheel's local space
    pub left_axis: Vec3,
    pub right_axis: Vec3,

    pub position: WheelPosition,
    pub dir: f32,

    pub left_center_world: Vec3,
    pub right_center_world: Vec3,
    pub left_axis_world: Vec3,
    pub right_axis_world: Vec3,
    observed_revision: Option<u64>,
}

impl WheelHinge {
    /// `front` is given in the parent's local space; `up` is the parent-local
    /// up direction.
    pub fn new(
        scene: &Scene,
        hinge: &str,
        left_wheel: NodeRef,
        right_wheel: NodeRef,
        parent: NodeRef,
        front: Vec3,
        up: Vec3,
    ) -> Result<Self> {
        let left_center =
            left_wheel.world_to_local(scene, hinge, left_wheel.bounding_center(scene, hinge)?)?;
        let right_center =
            right_wheel.world_to_local(scene, hinge, right_wheel.bounding_center(scene, hinge)?)?;
        let parent_center =
            parent.world_to_local(scene, hinge, parent.bounding_center(scene, hinge)?)?;

        let mut wheel = Self {
            left_wheel,
            right_wheel,
            parent,
            parent_center,
            left_center,
            right_center,
            front,
            left_axis: Vec3::ZERO,
            right_axis: Vec3::ZERO,
            position: WheelPosition::FrontLeft,
            dir: 1.0,
            left_center_world: Vec3::ZERO,
            right_center_world: Vec3::ZERO,
            left_axis_world: Vec3::ZERO,
            right_axis_world: Vec3::ZERO,
            observed_revision: None,
        };
        wheel.refresh_world_state(hinge, scene)?;

        // Classification happens in the parent frame; raw dot products keep
        // degenerate layouts finite.
        let left = wheel.parent.world_to_local(scene, hinge, wheel.left_center_world)?;
        let right = wheel.parent.world_to_local(scene, hinge, wheel.right_center_world)?;
        let mid = (left + right) * 0.5;
        let forward = front - parent_center;
        let left_side = up.cross(forward);

        let is_front = (mid - parent_center).dot(forward) >= 0.0;
        let is_left = (left - mid).dot(left_side) >= 0.0;
        wheel.position = WheelPosition::new(is_front, is_left);
        wheel.dir = if is_left { 1.0 } else { -1.0 };

        log::debug!("wheel hinge '{hinge}': {} dir {}", wheel.position, wheel.dir);

        wheel.left_axis = (left_center
            - wheel
                .left_wheel
                .world_to_local(scene, hinge, wheel.right_center_world)?)
        .normalize_or_zero();
        wheel.right_axis = (right_center
            - wheel
                .right_wheel
                .world_to_local(scene, hinge, wheel.left_center_world)?)
        .normalize_or_zero();

        Ok(wheel)
    }

    pub fn load(
        scene: &Scene,
        root: NodeHandle,
        record: &WheelRecord,
        config: &DynamicsConfig,
    ) -> Result<Hinge> {
        let parent = NodeRef::resolve(scene, root, &record.parent)?;
        let left = NodeRef::resolve(scene, root, &record.left)?;
        let right = NodeRef::resolve(scene, root, &record.right)?;
        let kind = Self::new(
            scene,
            &record.name,
            left,
            right,
            parent,
            record.front.into(),
            config.up_axis,
        )?;

        Ok(Hinge::new(
            &record.name,
            HingeKind::Wheel(kind),
            record.upm.unwrap_or(config.wheel_upm),
            0.0,
        ))
    }
}

impl Articulation for WheelHinge {
    fn refresh_world_state(&mut self, hinge: &str, scene: &Scene) -> Result<()> {
        let revision = self.parent.world_revision(scene, hinge)?;
        if self.observed_revision == Some(revision) {
            return Ok(());
        }

        self.left_center_world = self.left_wheel.local_to_world(scene, hinge, self.left_center)?;
        self.right_center_world = self.right_wheel.local_to_world(scene, hinge, self.right_center)?;
        self.left_axis_world = (self.left_center_world - self.right_center_world).normalize_or_zero();
        self.right_axis_world = -self.left_axis_world;
        self.observed_revision = Some(revision);
        Ok(())
    }

    fn rotate(&self, hinge: &str, scene: &mut Scene, angle: f32) -> Result<()> {
        orbit_and_spin(
            scene,
            hinge,
            &self.left_wheel,
            self.left_center_world,
            self.left_axis_world,
            self.left_axis,
            angle * self.dir,
        )?;
        orbit_and_spin(
            scene,
            hinge,
            &self.right_wheel,
            self.right_center_world,
            self.right_axis_world,
            self.right_axis,
            -angle * self.dir,
        )
    }

    fn to_record(&self, hinge: &Hinge) -> HingeRecord {
        HingeRecord::Wheel(WheelRecord {
            name: hinge.name.clone(),
            parent: self.parent.name.clone(),
            left: self.left_wheel.name.clone(),
            right: self.right_wheel.name.clone(),
            front: self.front.into(),
            upm: Some(hinge.upm),
        })
    }
}
