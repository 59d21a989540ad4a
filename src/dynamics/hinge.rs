//! Hinge state shared by all kinds and the per-kind capability trait.

use glam::{Quat, Vec3};

use crate::config::DynamicsConfig;
use crate::dynamics::document::HingeRecord;
use crate::dynamics::door::DoorHinge;
use crate::dynamics::propeller::PropellerHinge;
use crate::dynamics::wheel::WheelHinge;
use crate::errors::{DynamicsError, Result};
use crate::scene::{NodeHandle, Scene};

/// Non-owning reference to a scene node.
///
/// Keeps the node's name next to the handle so the hinge can be saved and
/// diagnosed even after the node itself is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub handle: NodeHandle,
    pub name: String,
}

impl NodeRef {
    /// Captures a live handle. Returns `None` for stale handles.
    #[must_use]
    pub fn from_handle(scene: &Scene, handle: NodeHandle) -> Option<Self> {
        scene.name(handle).map(|name| Self {
            handle,
            name: name.to_owned(),
        })
    }

    /// Resolves `name` against `root` (self match, else descendant lookup).
    pub fn resolve(scene: &Scene, root: NodeHandle, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(DynamicsError::UnresolvedNode("<unnamed>".to_owned()));
        }
        scene
            .resolve(root, name)
            .map(|handle| Self {
                handle,
                name: name.to_owned(),
            })
            .ok_or_else(|| DynamicsError::UnresolvedNode(name.to_owned()))
    }

    pub(crate) fn stale(&self, hinge: &str) -> DynamicsError {
        DynamicsError::StaleNode {
            hinge: hinge.to_owned(),
            node: self.name.clone(),
        }
    }

    pub(crate) fn local_to_world(&self, scene: &Scene, hinge: &str, point: Vec3) -> Result<Vec3> {
        scene
            .local_to_world(self.handle, point)
            .ok_or_else(|| self.stale(hinge))
    }

    pub(crate) fn world_to_local(&self, scene: &Scene, hinge: &str, point: Vec3) -> Result<Vec3> {
        scene
            .world_to_local(self.handle, point)
            .ok_or_else(|| self.stale(hinge))
    }

    /// World-space center of the node's geometry (its origin if it has none).
    pub(crate) fn bounding_center(&self, scene: &Scene, hinge: &str) -> Result<Vec3> {
        scene
            .bounding_center(self.handle)
            .ok_or_else(|| self.stale(hinge))
    }

    pub(crate) fn world_revision(&self, scene: &Scene, hinge: &str) -> Result<u64> {
        scene
            .world_revision(self.handle)
            .ok_or_else(|| self.stale(hinge))
    }
}

/// Per-kind behavior of a hinge.
pub trait Articulation {
    /// Recomputes cached world-space pivots and axes if the observed node
    /// moved since the last call. Never rotates anything.
    fn refresh_world_state(&mut self, hinge: &str, scene: &Scene) -> Result<()>;

    /// Rotates the managed node(s) by `angle` radians about the hinge axis.
    fn rotate(&self, hinge: &str, scene: &mut Scene, angle: f32) -> Result<()>;

    /// Serializes the identifying data of this hinge.
    fn to_record(&self, hinge: &Hinge) -> HingeRecord;
}

/// Orbits `node` about the world pivot and spins it in place by the same
/// angle, so the node turns rigidly about the line (`center_world`, `axis_world`).
///
/// `axis_local` must be `axis_world` expressed in the node's own frame.
pub(crate) fn orbit_and_spin(
    scene: &mut Scene,
    hinge: &str,
    node: &NodeRef,
    center_world: Vec3,
    axis_world: Vec3,
    axis_local: Vec3,
    angle: f32,
) -> Result<()> {
    if axis_world == Vec3::ZERO || angle == 0.0 {
        return Ok(());
    }

    let parent_world = scene
        .parent_world_matrix(node.handle)
        .ok_or_else(|| node.stale(hinge))?;
    let position = scene.position(node.handle).ok_or_else(|| node.stale(hinge))?;

    let world_position = parent_world.transform_point3(position);
    let orbited = Quat::from_axis_angle(axis_world, angle) * (world_position - center_world) + center_world;

    scene.set_position(node.handle, parent_world.inverse().transform_point3(orbited));
    scene.rotate_on_axis(node.handle, axis_local, angle);
    scene.update_matrix(node.handle);
    Ok(())
}

/// The concrete hinge behaviors.
#[derive(Debug, Clone)]
pub enum HingeKind {
    Propeller(PropellerHinge),
    Door(DoorHinge),
    Wheel(WheelHinge),
}

impl HingeKind {
    /// Type tag used in hinge documents.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Propeller(_) => "propeller",
            Self::Door(_) => "door",
            Self::Wheel(_) => "wheel",
        }
    }

    /// Whether hinges of this kind advance on every tick.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::Door(_))
    }

    fn articulation(&self) -> &dyn Articulation {
        match self {
            Self::Propeller(h) => h,
            Self::Door(h) => h,
            Self::Wheel(h) => h,
        }
    }

    fn articulation_mut(&mut self) -> &mut dyn Articulation {
        match self {
            Self::Propeller(h) => h,
            Self::Door(h) => h,
            Self::Wheel(h) => h,
        }
    }
}

/// A scripted kinematic joint.
#[derive(Debug, Clone)]
pub struct Hinge {
    /// Identifier within the owning registry
    pub name: String,
    /// Advances automatically on every tick
    pub continuous: bool,
    /// Upper bound of `|rotated_angle|` in radians; `0.0` means unlimited
    pub angle_limit: f32,
    /// Accumulated signed rotation since creation
    pub rotated_angle: f32,
    /// Angular speed in units per minute
    pub upm: f32,
    pub kind: HingeKind,
}

impl Hinge {
    #[must_use]
    pub fn new(name: &str, kind: HingeKind, upm: f32, angle_limit: f32) -> Self {
        Self {
            name: name.to_owned(),
            continuous: kind.is_continuous(),
            angle_limit: angle_limit.max(0.0),
            rotated_angle: 0.0,
            upm,
            kind,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_limited(&self) -> bool {
        self.angle_limit > 0.0
    }

    /// Applies a rotation without touching `rotated_angle`.
    pub fn rotate(&mut self, scene: &mut Scene, angle: f32) -> Result<()> {
        let name = self.name.as_str();
        self.kind.articulation_mut().refresh_world_state(name, scene)?;
        self.kind.articulation().rotate(name, scene, angle)
    }

    /// Where `rotated_angle` would end up after adding `angle`, respecting
    /// the limit.
    #[must_use]
    pub fn target_angle(&self, angle: f32) -> f32 {
        let target = self.rotated_angle + angle;
        if self.is_limited() {
            target.clamp(-self.angle_limit, self.angle_limit)
        } else {
            target
        }
    }

    /// Rotates by `angle` clamped to the limit and accumulates it.
    ///
    /// Returns the increment actually applied. A non-finite `angle` (or one
    /// that would push an unlimited hinge to infinity) is rejected and
    /// nothing moves.
    pub fn advance(&mut self, scene: &mut Scene, angle: f32) -> Result<f32> {
        let target = self.target_angle(angle);
        if !angle.is_finite() || !target.is_finite() {
            return Err(DynamicsError::InvalidParameter(format!(
                "{}: non-finite angle {angle}",
                self.name
            )));
        }
        let increment = target - self.rotated_angle;
        if increment == 0.0 {
            return Ok(0.0);
        }

        self.rotate(scene, increment)?;
        self.rotated_angle = target;
        Ok(increment)
    }

    /// Serializes this hinge into a document record.
    #[must_use]
    pub fn to_record(&self) -> HingeRecord {
        self.kind.articulation().to_record(self)
    }

    /// Rebuilds a hinge from a document record, resolving node names
    /// against `root`.
    pub fn from_record(
        scene: &Scene,
        root: NodeHandle,
        record: &HingeRecord,
        config: &DynamicsConfig,
    ) -> Result<Self> {
        match record {
            HingeRecord::Door(r) => DoorHinge::load(scene, root, r, config),
            HingeRecord::Propeller(r) => PropellerHinge::load(scene, root, r, config),
            HingeRecord::Wheel(r) => WheelHinge::load(scene, root, r, config),
        }
    }
}
