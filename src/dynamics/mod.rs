//! Hinge Dynamics
//!
//! Scripted kinematic joints for articulated models:
//!
//! - [`PropellerHinge`]: continuous spin about an axis fixed to the propeller
//! - [`DoorHinge`]: bounded swing about a hinge line on an anchor body
//! - [`WheelHinge`]: two wheels rolling together on a common axle
//!
//! [`Dynamics`] owns the hinges, integrates them over time and persists their
//! definitions as JSON, separate from the model geometry.
//!
//! ```rust,ignore
//! let mut dynamics = Dynamics::new();
//! dynamics.load("plane.hinges.json", &mut scene, model_root)?;
//!
//! // every frame
//! dynamics.update(&mut scene);
//! ```

pub mod document;
pub mod door;
pub mod hinge;
pub mod propeller;
pub mod registry;
pub mod wheel;

pub use document::{HingeDocument, HingeRecord, Point3};
pub use door::{DoorHinge, SwingDirection};
pub use hinge::{Articulation, Hinge, HingeKind, NodeRef};
pub use propeller::PropellerHinge;
pub use registry::{ChangeReason, Dynamics, HingesChanged, ListenerKey};
pub use wheel::{WheelHinge, WheelPosition};
