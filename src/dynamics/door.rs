use glam::Vec3;

use crate::config::DynamicsConfig;
use crate::dynamics::document::{DoorRecord, HingeRecord};
use crate::dynamics::hinge::{Articulation, Hinge, HingeKind, NodeRef, orbit_and_spin};
use crate::errors::Result;
use crate::scene::{NodeHandle, Scene};

/// Turning sense of a door for positive hinge angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingDirection {
    Clockwise,
    CounterClockwise,
}

impl SwingDirection {
    #[inline]
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Clockwise => -1.0,
            Self::CounterClockwise => 1.0,
        }
    }
}

/// Bounded swing of `element` about a hinge line fixed on `anchor`.
///
/// The hinge line and the swing direction are derived once at construction.
#[derive(Debug, Clone)]
pub struct DoorHinge {
    pub anchor: NodeRef,
    pub element: NodeRef,
    /// Hinge line endpoints in anchor-local space
    pub point1: Vec3,
    pub point2: Vec3,

    pub direction: SwingDirection,
    pub axis_world: Vec3,
    pub point_world: Vec3,
    /// Hinge axis in element-local space
    pub axis_local: Vec3,
}

impl DoorHinge {
    /// `point1` and `point2` are given in the anchor's local space.
    pub fn new(
        scene: &Scene,
        hinge: &str,
        anchor: NodeRef,
        element: NodeRef,
        point1: Vec3,
        point2: Vec3,
    ) -> Result<Self> {
        let hp1 = anchor.local_to_world(scene, hinge, point1)?;
        let hp2 = anchor.local_to_world(scene, hinge, point2)?;

        let axis_world = (hp1 - hp2).normalize_or_zero();
        let axis_local = (element.world_to_local(scene, hinge, hp1)?
            - element.world_to_local(scene, hinge, hp2)?)
        .normalize_or_zero();
        let point_world = (hp1 + hp2) * 0.5;

        // Which side of the hinge line the door leaf sits on decides
        // whether it opens clockwise.
        let hinge_point = (point1 + point2) * 0.5;
        let anchor_center = anchor.bounding_center(scene, hinge)?;
        let element_center = element.bounding_center(scene, hinge)?;

        let anchor_to_hinge =
            (hinge_point - anchor.world_to_local(scene, hinge, anchor_center)?).normalize_or_zero();
        let element_to_hinge =
            (hinge_point - anchor.world_to_local(scene, hinge, element_center)?).normalize_or_zero();

        let left_right = anchor_to_hinge.cross(element_to_hinge).dot(point1 - point2);
        let direction = if left_right < 0.0 {
            SwingDirection::Clockwise
        } else {
            SwingDirection::CounterClockwise
        };

        Ok(Self {
            anchor,
            element,
            point1,
            point2,
            direction,
            axis_world,
            point_world,
            axis_local,
        })
    }

    pub fn load(
        scene: &Scene,
        root: NodeHandle,
        record: &DoorRecord,
        config: &DynamicsConfig,
    ) -> Result<Hinge> {
        let anchor = NodeRef::resolve(scene, root, &record.anchor)?;
        let element = NodeRef::resolve(scene, root, &record.element)?;
        let kind = Self::new(
            scene,
            &record.name,
            anchor,
            element,
            record.point1.into(),
            record.point2.into(),
        )?;

        Ok(Hinge::new(
            &record.name,
            HingeKind::Door(kind),
            record.upm.unwrap_or(config.door_upm),
            record.angle_limit,
        ))
    }
}

impl Articulation for DoorHinge {
    fn refresh_world_state(&mut self, _hinge: &str, _scene: &Scene) -> Result<()> {
        Ok(())
    }

    fn rotate(&self, hinge: &str, scene: &mut Scene, angle: f32) -> Result<()> {
        orbit_and_spin(
            scene,
            hinge,
            &self.element,
            self.point_world,
            self.axis_world,
            self.axis_local,
            angle * self.direction.sign(),
        )
    }

    fn to_record(&self, hinge: &Hinge) -> HingeRecord {
        HingeRecord::Door(DoorRecord {
            name: hinge.name.clone(),
            anchor: self.anchor.name.clone(),
            element: self.element.name.clone(),
            point1: self.point1.into(),
            point2: self.point2.into(),
            angle_limit: hinge.angle_limit,
            upm: Some(hinge.upm),
        })
    }
}
