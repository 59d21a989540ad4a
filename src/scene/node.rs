use crate::scene::NodeHandle;
use crate::scene::bounds::BoundingBox;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// A named scene node.
///
/// # Hierarchy
///
/// Nodes form a tree structure through parent-child relationships:
/// - `parent`: Optional handle to parent node (None for root nodes)
/// - `children`: List of child node handles
///
/// # Geometry
///
/// `bounds` is the node's own local-space extent. Hinges use it to locate
/// rotational centers; it does not include children.
#[derive(Debug, Clone)]
pub struct Node {
    /// Name used to resolve hinge definitions
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    /// Transform component
    pub transform: Transform,

    /// Local-space geometry bounds, if the node carries geometry
    pub bounds: Option<BoundingBox>,
}

impl Node {
    /// Creates a new node with default transform and no geometry.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            bounds: None,
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Returns a reference to the world transformation matrix.
    ///
    /// Only valid after the owning scene refreshed its matrices.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
