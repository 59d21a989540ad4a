use glam::Vec3;

use crate::config::DynamicsConfig;
use crate::dynamics::document::{HingeRecord, PropellerRecord};
use crate::dynamics::hinge::{Articulation, Hinge, HingeKind, NodeRef, orbit_and_spin};
use crate::errors::Result;
use crate::scene::{NodeHandle, Scene};

/// Continuous spin about an axis fixed to the propeller itself.
///
/// The propeller's origin is usually not its rotational center, so every
/// rotation orbits the origin about the geometric center and spins the node
/// in place by the same angle. The axis banks with the propeller's ancestors.
#[derive(Debug, Clone)]
pub struct PropellerHinge {
    pub propeller: NodeRef,
    /// Reference point in propeller-local space
    pub point: Vec3,
    /// Geometric center in propeller-local space
    pub center: Vec3,
    /// Spin axis in propeller-local space
    pub axis: Vec3,

    pub center_world: Vec3,
    pub axis_world: Vec3,
    observed_revision: Option<u64>,
}

impl PropellerHinge {
    /// `point` is given in the propeller's local space.
    pub fn new(scene: &Scene, hinge: &str, propeller: NodeRef, point: Vec3) -> Result<Self> {
        let center_world = propeller.bounding_center(scene, hinge)?;
        let center = propeller.world_to_local(scene, hinge, center_world)?;

        let mut propeller_hinge = Self {
            propeller,
            point,
            center,
            axis: (point - center).normalize_or_zero(),
            center_world: Vec3::ZERO,
            axis_world: Vec3::ZERO,
            observed_revision: None,
        };
        propeller_hinge.refresh_world_state(hinge, scene)?;
        Ok(propeller_hinge)
    }

    pub fn load(
        scene: &Scene,
        root: NodeHandle,
        record: &PropellerRecord,
        config: &DynamicsConfig,
    ) -> Result<Hinge> {
        let propeller = NodeRef::resolve(scene, root, &record.propeller)?;
        let kind = Self::new(scene, &record.name, propeller, record.point.into())?;

        Ok(Hinge::new(
            &record.name,
            HingeKind::Propeller(kind),
            record.upm.unwrap_or(config.propeller_upm),
            0.0,
        ))
    }
}

impl Articulation for PropellerHinge {
    fn refresh_world_state(&mut self, hinge: &str, scene: &Scene) -> Result<()> {
        let revision = self.propeller.world_revision(scene, hinge)?;
        if self.observed_revision == Some(revision) {
            return Ok(());
        }

        self.center_world = self.propeller.local_to_world(scene, hinge, self.center)?;
        let point_world = self.propeller.local_to_world(scene, hinge, self.point)?;
        self.axis_world = (point_world - self.center_world).normalize_or_zero();
        self.observed_revision = Some(revision);
        Ok(())
    }

    fn rotate(&self, hinge: &str, scene: &mut Scene, angle: f32) -> Result<()> {
        orbit_and_spin(
            scene,
            hinge,
            &self.propeller,
            self.center_world,
            self.axis_world,
            self.axis,
            angle,
        )
    }

    fn to_record(&self, hinge: &Hinge) -> HingeRecord {
        HingeRecord::Propeller(PropellerRecord {
            name: hinge.name.clone(),
            propeller: self.propeller.name.clone(),
            point: self.point.into(),
            upm: Some(hinge.upm),
        })
    }
}
