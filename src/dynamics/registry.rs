use std::f64::consts::PI;
use std::path::Path;
use std::time::Duration;

use glam::Vec3;
use slotmap::{SlotMap, new_key_type};

use crate::config::DynamicsConfig;
use crate::dynamics::document::HingeDocument;
use crate::dynamics::door::DoorHinge;
use crate::dynamics::hinge::{Hinge, HingeKind, NodeRef};
use crate::dynamics::propeller::PropellerHinge;
use crate::dynamics::wheel::WheelHinge;
use crate::errors::{DynamicsError, Result};
use crate::scene::{NodeHandle, Scene};
use crate::utils::Timer;

new_key_type! {
    /// Identifies a change listener registered with [`Dynamics::subscribe`].
    pub struct ListenerKey;
}

/// What happened to the hinge collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeReason {
    Created(String),
    Deleted(String),
    Reset,
    Loaded,
}

/// Change notification delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HingesChanged {
    pub reason: ChangeReason,
    /// Hinge names after the change, in collection order
    pub names: Vec<String>,
}

type Listener = Box<dyn FnMut(&HingesChanged) + Send>;

/// Owns the hinges of one articulated model and drives their animation.
///
/// The registry is driven once per frame through [`update`](Self::update),
/// or jumps ahead with [`fastforward`](Self::fastforward). All operations are
/// synchronous; nothing here panics or propagates past the registry except
/// through returned values.
pub struct Dynamics {
    hinges: Vec<Hinge>,
    config: DynamicsConfig,
    timer: Timer,
    listeners: SlotMap<ListenerKey, Listener>,
    change_count: u64,
}

impl Default for Dynamics {
    fn default() -> Self {
        Self::new()
    }
}

impl Dynamics {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DynamicsConfig::default())
    }

    #[must_use]
    pub fn with_config(config: DynamicsConfig) -> Self {
        Self {
            hinges: Vec::new(),
            config,
            timer: Timer::new(),
            listeners: SlotMap::with_key(),
            change_count: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DynamicsConfig {
        &self.config
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn hinges(&self) -> &[Hinge] {
        &self.hinges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hinges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hinges.is_empty()
    }

    #[must_use]
    pub fn hinge_names(&self) -> Vec<String> {
        self.hinges.iter().map(|h| h.name.clone()).collect()
    }

    /// First hinge with exactly this name.
    #[must_use]
    pub fn hinge(&self, name: &str) -> Option<&Hinge> {
        self.hinges.iter().find(|h| h.name == name)
    }

    pub fn hinge_mut(&mut self, name: &str) -> Option<&mut Hinge> {
        self.hinges.iter_mut().find(|h| h.name == name)
    }

    /// Changes the rotation rate of a hinge. Returns whether the rate was
    /// stored; unknown names and non-finite rates are refused.
    pub fn set_upm(&mut self, name: &str, upm: f32) -> bool {
        if !upm.is_finite() {
            log::warn!("set_upm: ignoring non-finite rate {upm} for '{name}'");
            return false;
        }
        if let Some(hinge) = self.hinge_mut(name) {
            hinge.upm = upm;
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Change notification
    // ========================================================================

    /// Registers a listener called after every change to the collection.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerKey
    where
        F: FnMut(&HingesChanged) + Send + 'static,
    {
        self.listeners.insert(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    /// Number of change notifications fired so far.
    #[must_use]
    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    fn notify(&mut self, reason: ChangeReason) {
        self.change_count += 1;
        let event = HingesChanged {
            reason,
            names: self.hinge_names(),
        };
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }

    // ========================================================================
    // Time integration
    // ========================================================================

    /// Advances continuous hinges by the time elapsed since the previous call.
    pub fn update(&mut self, scene: &mut Scene) {
        let elapsed = self.timer.tick();
        self.advance(scene, elapsed);
    }

    /// Advances continuous hinges by an explicit elapsed time.
    ///
    /// Each hinge turns by `π · upm / 60000 · elapsed_ms`. A step that would
    /// carry a limited hinge past its limit is shortened so the hinge lands
    /// exactly on the limit instead of being skipped; once there, further
    /// steps in that direction do nothing.
    pub fn advance(&mut self, scene: &mut Scene, elapsed: Duration) {
        if elapsed.is_zero() || self.hinges.is_empty() {
            return;
        }
        let millis = elapsed.as_secs_f64() * 1000.0;

        scene.update_matrix_world();
        for hinge in self.hinges.iter_mut().filter(|h| h.continuous) {
            let angle = (PI * f64::from(hinge.upm) / 60000.0 * millis) as f32;
            if let Err(e) = hinge.advance(scene, angle) {
                log::warn!("update: {e}");
            }
        }
    }

    /// Jumps every continuous hinge ahead by `seconds`.
    pub fn fastforward(&mut self, scene: &mut Scene, seconds: f32) {
        scene.update_matrix_world();
        for hinge in self.hinges.iter_mut().filter(|h| h.continuous) {
            if let Err(e) = hinge.advance(scene, fastforward_angle(hinge.upm, seconds)) {
                log::warn!("fastforward: {e}");
            }
        }
    }

    /// Jumps the hinges named `name` ahead by `seconds`, continuous or not.
    ///
    /// Returns whether any hinge matched.
    pub fn fastforward_hinge(&mut self, scene: &mut Scene, name: &str, seconds: f32) -> bool {
        scene.update_matrix_world();
        let mut found = false;
        for hinge in self.hinges.iter_mut().filter(|h| h.name == name) {
            found = true;
            if let Err(e) = hinge.advance(scene, fastforward_angle(hinge.upm, seconds)) {
                log::warn!("fastforward: {e}");
            }
        }
        found
    }

    // ========================================================================
    // Creation & deletion
    // ========================================================================

    /// Adds a propeller spinning about the line from its geometric center to
    /// the world-space point `back`.
    pub fn create_propeller_hinge(
        &mut self,
        scene: &mut Scene,
        name: &str,
        propeller: Option<NodeHandle>,
        back: Vec3,
    ) -> Result<()> {
        let Some(propeller) = live_ref(scene, propeller) else {
            return Err(rejected("create_propeller_hinge"));
        };

        scene.update_matrix_world();
        let point = propeller.world_to_local(scene, name, back)?;
        let kind = PropellerHinge::new(scene, name, propeller, point)?;

        self.push(Hinge::new(name, HingeKind::Propeller(kind), self.config.propeller_upm, 0.0));
        Ok(())
    }

    /// Adds a door swinging `door` about the world-space line
    /// `upper`–`lower`, fixed on `body`.
    pub fn create_door_hinge(
        &mut self,
        scene: &mut Scene,
        name: &str,
        door: Option<NodeHandle>,
        body: Option<NodeHandle>,
        upper: Vec3,
        lower: Vec3,
    ) -> Result<()> {
        let (Some(element), Some(anchor)) = (live_ref(scene, door), live_ref(scene, body)) else {
            return Err(rejected("create_door_hinge"));
        };

        scene.update_matrix_world();
        let point1 = anchor.world_to_local(scene, name, upper)?;
        let point2 = anchor.world_to_local(scene, name, lower)?;
        let kind = DoorHinge::new(scene, name, anchor, element, point1, point2)?;

        self.push(Hinge::new(
            name,
            HingeKind::Door(kind),
            self.config.door_upm,
            self.config.door_angle_limit,
        ));
        Ok(())
    }

    /// Adds a wheel pair rolling toward the world-space point `front`.
    ///
    /// The wheels' nearest common ancestor becomes the hinge parent.
    pub fn create_wheel_hinge(
        &mut self,
        scene: &mut Scene,
        name: &str,
        left: Option<NodeHandle>,
        right: Option<NodeHandle>,
        front: Vec3,
    ) -> Result<()> {
        let (Some(left), Some(right)) = (live_ref(scene, left), live_ref(scene, right)) else {
            return Err(rejected("create_wheel_hinge"));
        };

        let parent = scene
            .common_parent(left.handle, right.handle)
            .and_then(|p| NodeRef::from_handle(scene, p))
            .ok_or_else(|| {
                log::error!("create_wheel_hinge: cannot determine common parent");
                DynamicsError::NoCommonParent {
                    left: left.name.clone(),
                    right: right.name.clone(),
                }
            })?;

        scene.update_matrix_world();
        let front = parent.world_to_local(scene, name, front)?;
        let kind = WheelHinge::new(scene, name, left, right, parent, front, self.config.up_axis)?;

        self.push(Hinge::new(name, HingeKind::Wheel(kind), self.config.wheel_upm, 0.0));
        Ok(())
    }

    fn push(&mut self, hinge: Hinge) {
        let name = hinge.name.clone();
        self.hinges.push(hinge);
        self.notify(ChangeReason::Created(name));
    }

    /// Removes the first hinge named `name`. Returns whether one was removed.
    pub fn delete_hinge(&mut self, name: &str) -> bool {
        let Some(index) = self.hinges.iter().position(|h| h.name == name) else {
            return false;
        };
        self.hinges.remove(index);
        self.notify(ChangeReason::Deleted(name.to_owned()));
        true
    }

    /// Removes every hinge.
    pub fn reset_all(&mut self) {
        self.hinges.clear();
        self.notify(ChangeReason::Reset);
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Replaces all hinges with the definitions in the file at `path`.
    ///
    /// See [`load_str`](Self::load_str).
    pub fn load(&mut self, path: impl AsRef<Path>, scene: &mut Scene, root: NodeHandle) -> Result<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).inspect_err(|e| {
            log::error!("Couldn't open file {}: {e}", path.display());
        })?;
        self.load_str(&json, scene, root)
    }

    /// Replaces all hinges with the definitions in `json`, resolving node
    /// names against `root`.
    ///
    /// A malformed document (including an unknown hinge type) fails the whole
    /// call and leaves the registry untouched. Entries whose nodes cannot be
    /// found are skipped. Returns the number of hinges loaded.
    pub fn load_str(&mut self, json: &str, scene: &mut Scene, root: NodeHandle) -> Result<usize> {
        let document: HingeDocument = serde_json::from_str(json)?;
        self.load_document(&document, scene, root)
    }

    pub fn load_document(
        &mut self,
        document: &HingeDocument,
        scene: &mut Scene,
        root: NodeHandle,
    ) -> Result<usize> {
        if !scene.contains(root) {
            return Err(rejected("load"));
        }

        scene.update_matrix_world();
        self.hinges.clear();
        for record in &document.hinges {
            match Hinge::from_record(scene, root, record, &self.config) {
                Ok(hinge) => self.hinges.push(hinge),
                Err(e) => log::warn!("Skipping hinge '{}': {e}", record.name()),
            }
        }
        self.timer.restart();

        log::info!("Loaded {} of {} hinges", self.hinges.len(), document.hinges.len());
        self.notify(ChangeReason::Loaded);
        Ok(self.hinges.len())
    }

    #[must_use]
    pub fn to_document(&self) -> HingeDocument {
        HingeDocument {
            hinges: self.hinges.iter().map(Hinge::to_record).collect(),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Writes all hinges to the file at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        std::fs::write(path, json).inspect_err(|e| {
            log::error!("Couldn't write file {}: {e}", path.display());
        })?;
        log::info!("Saved {} hinges to {}", self.hinges.len(), path.display());
        Ok(())
    }
}

fn fastforward_angle(upm: f32, seconds: f32) -> f32 {
    (PI * f64::from(upm) / 60.0 * f64::from(seconds)) as f32
}

fn live_ref(scene: &Scene, handle: Option<NodeHandle>) -> Option<NodeRef> {
    handle.and_then(|h| NodeRef::from_handle(scene, h))
}

fn rejected(operation: &str) -> DynamicsError {
    log::error!("{operation}: null parameter");
    DynamicsError::InvalidParameter(operation.to_owned())
}
