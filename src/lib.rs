#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod dynamics;
pub mod errors;
pub mod scene;
pub mod utils;

pub use config::DynamicsConfig;
pub use dynamics::{Dynamics, Hinge, HingeKind, HingesChanged};
pub use errors::{DynamicsError, Result};
pub use scene::{BoundingBox, Node, NodeHandle, Scene};
