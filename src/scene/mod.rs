//! Scene graph module
//!
//! The minimal scene graph the hinge engine operates on:
//! - Node: named scene node with parent/child relationships and a transform
//! - Transform: position, rotation, scale with cached matrices
//! - BoundingBox: local geometry extents used to locate rotation centers
//! - Scene: node container, coordinate conversions and name lookup
//! - transform_system: hierarchy matrix propagation

pub mod bounds;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use bounds::BoundingBox;
pub use node::Node;
pub use scene::{NodeBuilder, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Non-owning handle to a node stored in a [`Scene`].
    pub struct NodeHandle;
}
