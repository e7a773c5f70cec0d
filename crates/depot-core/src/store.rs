//! Store boundary for structural nodes
//!
//! Pure trait signatures only; Depot never persists anything itself.
//! A store collaborator loads nodes into a [`Forest`](crate::tree::Forest)
//! and is the blocking I/O boundary for lazy parent materialization.

use crate::errors::DepotResult;
use crate::tree::{EntityId, NodeKind, StructuralNode};

/// Loads structural nodes from persistent storage.
///
/// Failures propagate unchanged through this subsystem; no retries are
/// performed here.
pub trait NodeStore {
    /// Load a single node, including its parent reference.
    fn load_node(&self, kind: NodeKind, id: EntityId) -> DepotResult<StructuralNode>;

    /// Load the direct children of a node.
    fn load_children(&self, kind: NodeKind, id: EntityId) -> DepotResult<Vec<StructuralNode>>;
}
