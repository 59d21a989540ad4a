//! Error Types
//!
//! This module defines the error types used by the hinge dynamics engine.
//!
//! # Overview
//!
//! The main error type [`DynamicsError`] covers every failure mode of the
//! registry boundary:
//! - Scene node references that cannot be resolved by name
//! - Handles that went stale after the scene graph was edited
//! - Invalid creation parameters
//! - Document parsing and I/O failures
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, DynamicsError>`.
//!
//! ```rust,ignore
//! use myth_dynamics::errors::Result;
//!
//! fn reload(dynamics: &mut Dynamics, scene: &mut Scene, root: NodeHandle) -> Result<()> {
//!     dynamics.load("hinges.json", scene, root)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the dynamics engine.
#[derive(Error, Debug)]
pub enum DynamicsError {
    // ========================================================================
    // Scene Reference Errors
    // ========================================================================
    /// A node name from a hinge definition does not exist under the root.
    #[error("Hinge definition does not match model: {0} not found")]
    UnresolvedNode(String),

    /// A hinge refers to a node that has been removed from the scene.
    #[error("Hinge '{hinge}' refers to node '{node}' which no longer exists")]
    StaleNode {
        /// Name of the hinge holding the reference
        hinge: String,
        /// Stable name of the missing node
        node: String,
    },

    /// Two wheels do not share an ancestor in the scene graph.
    #[error("Cannot determine common parent of '{left}' and '{right}'")]
    NoCommonParent {
        /// Name of the left wheel node
        left: String,
        /// Name of the right wheel node
        right: String,
    },

    // ========================================================================
    // Parameter Errors
    // ========================================================================
    /// A creation operation received a null or invalid argument.
    #[error("{0}: null parameter")]
    InvalidParameter(String),

    // ========================================================================
    // Format & I/O Errors
    // ========================================================================
    /// Malformed hinge document or unknown hinge type.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Hinge document could not be opened, read or written.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Alias for `Result<T, DynamicsError>`.
pub type Result<T> = std::result::Result<T, DynamicsError>;
