//! Depot Core — structural tree model and unified errors
//!
//! Foundational types for Depot's hierarchical structural model: an
//! arena-backed forest of self-referencing nodes with cached derived
//! state (levels, breadcrumb paths) and write-time acyclicity
//! validation. Contains no persistence or presentation logic; stores
//! and UIs consume this crate through the traits and read-only views it
//! exposes.

#![forbid(unsafe_code)]

/// Unified error handling
pub mod errors;

/// Store boundary traits
pub mod store;

/// Structural node forest
pub mod tree;

pub use errors::{DepotError, DepotResult};
pub use store::NodeStore;
pub use tree::{Breadcrumb, EntityId, Forest, NodeId, NodeKind, StructuralNode, PATH_DELIMITER};
