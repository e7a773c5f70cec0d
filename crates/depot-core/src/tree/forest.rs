//! Arena-backed forest of structural nodes
//!
//! The forest owns every in-memory node, maintains the derived children
//! index, and implements the ancestor-walk operations (level, full path,
//! ancestry test, subtree enumeration).
//!
//! # Invariants
//!
//! - The parent relation is acyclic: `set_parent` validates at write time
//!   that the new parent is not a descendant of the node being moved.
//! - A node's level equals its parent's level plus one; the conceptual
//!   root has level `-1`, top-level nodes have level `0`.
//! - Every ancestor walk is bounded by the arena size, so a corrupted
//!   graph loaded wholesale from a store fails with `CycleDetected`
//!   instead of recursing forever.
//!
//! # Safety
//!
//! This module is `#![forbid(unsafe_code)]` (crate-wide).

use crate::errors::{DepotError, DepotResult};
use crate::tree::node::{EntityId, NodeId, NodeKind, PathCache, StructuralNode};
use indexmap::{IndexMap, IndexSet};

/// Default delimiter for [`Forest::full_path`].
pub const PATH_DELIMITER: &str = " → ";

/// Arena of structural nodes with a derived children index.
///
/// The `generation` counter increases on every rename or reparent; node
/// caches are stamped with the generation that produced them and are
/// recomputed when the stamp is stale.
#[derive(Debug, Default)]
pub struct Forest {
    nodes: IndexMap<NodeId, StructuralNode>,
    children: IndexMap<NodeId, IndexSet<NodeId>>,
    generation: u64,
    next_handle: u32,
}

impl Forest {
    /// Create an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the handle refers to a node in this arena.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Current cache generation. Bumped by rename and reparent.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Borrow a node.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is not in this arena.
    pub fn node(&self, id: NodeId) -> DepotResult<&StructuralNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| DepotError::not_found(format!("{id} is not in this forest")))
    }

    /// Insert a node, returning its arena handle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the node references a parent that is not in
    /// the arena, or `TypeMismatch` if the parent is of a different kind.
    pub fn insert(&mut self, node: StructuralNode) -> DepotResult<NodeId> {
        if let Some(parent) = node.parent {
            let parent_node = self.node(parent)?;
            if parent_node.kind != node.kind {
                return Err(DepotError::type_mismatch(format!(
                    "cannot attach {} node under {} parent {parent}",
                    node.kind, parent_node.kind
                )));
            }
        }

        let id = NodeId(self.next_handle);
        self.next_handle += 1;

        if let Some(parent) = node.parent {
            self.children.entry(parent).or_default().insert(id);
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Move a node under a new parent (or to the top level with `None`).
    ///
    /// Acyclicity is validated here, at write time: the new parent must
    /// not be the node itself or one of its descendants. This is a single
    /// ancestor walk per mutation instead of a check on every read.
    ///
    /// # Errors
    ///
    /// `NotFound`, `TypeMismatch`, or `CycleDetected` when the link would
    /// close a loop.
    pub fn set_parent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> DepotResult<()> {
        let kind = self.node(id)?.kind;

        if let Some(parent) = new_parent {
            let parent_node = self.node(parent)?;
            if parent_node.kind != kind {
                return Err(DepotError::type_mismatch(format!(
                    "cannot attach {kind} node under {} parent {parent}",
                    parent_node.kind
                )));
            }
            if parent == id {
                return Err(DepotError::cycle_detected(format!(
                    "{id} cannot be its own parent"
                )));
            }
            // The new parent must not sit below `id`.
            for ancestor in self.ancestors(parent)? {
                if ancestor == id {
                    return Err(DepotError::cycle_detected(format!(
                        "{parent} is a descendant of {id}"
                    )));
                }
            }
        }

        tracing::debug!(%id, new_parent = ?new_parent, "reparenting node");
        let old_parent = self.nodes[&id].parent;
        if let Some(old) = old_parent {
            if let Some(set) = self.children.get_mut(&old) {
                set.shift_remove(&id);
            }
        }
        if let Some(parent) = new_parent {
            self.children.entry(parent).or_default().insert(id);
        }

        let node = &mut self.nodes[&id];
        node.parent = new_parent;
        self.bump_generation();
        Ok(())
    }

    /// Rename a node. Invalidates path caches forest-wide via the
    /// generation counter.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is not in this arena.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> DepotResult<()> {
        self.node(id)?;
        self.nodes[&id].name = name.into();
        self.bump_generation();
        Ok(())
    }

    /// Replace a node's comment. Empty strings are normalized to `None`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is not in this arena.
    pub fn set_comment(&mut self, id: NodeId, comment: Option<String>) -> DepotResult<()> {
        self.node(id)?;
        self.nodes[&id].comment = comment.filter(|c| !c.is_empty());
        Ok(())
    }

    /// Record the persistent identifier a store assigned to a node.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is not in this arena.
    pub fn mark_saved(&mut self, id: NodeId, entity_id: EntityId) -> DepotResult<()> {
        self.node(id)?;
        self.nodes[&id].id = Some(entity_id);
        Ok(())
    }

    /// Parent handle of a node, if any.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is not in this arena.
    pub fn parent(&self, id: NodeId) -> DepotResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Persistent identifier of a node's parent.
    ///
    /// Resolves to [`EntityId::ROOT`] when the node is top-level or its
    /// parent has not been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is not in this arena.
    pub fn parent_entity_id(&self, id: NodeId) -> DepotResult<EntityId> {
        match self.node(id)?.parent {
            Some(parent) => Ok(self.node(parent)?.id.unwrap_or(EntityId::ROOT)),
            None => Ok(EntityId::ROOT),
        }
    }

    /// Ancestor handles of a node, immediate parent first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown handle; `CycleDetected` if the walk
    /// exceeds the arena size (corrupted graph).
    pub fn ancestors(&self, id: NodeId) -> DepotResult<Vec<NodeId>> {
        self.node(id)?;
        let mut out = Vec::new();
        let mut current = self.nodes[&id].parent;
        while let Some(ancestor) = current {
            if out.len() >= self.nodes.len() {
                return Err(DepotError::cycle_detected(format!(
                    "ancestor walk from {id} exceeded {} nodes",
                    self.nodes.len()
                )));
            }
            out.push(ancestor);
            current = self.node(ancestor)?.parent;
        }
        Ok(out)
    }

    /// Whether `id` sits somewhere below `ancestor`.
    ///
    /// Both nodes must be of the same kind. An unsaved node is an
    /// in-memory placeholder and is never a child of anything.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when the kinds differ, `NotFound` for unknown
    /// handles, `CycleDetected` on a corrupted graph.
    pub fn is_child_of(&self, id: NodeId, ancestor: NodeId) -> DepotResult<bool> {
        let node = self.node(id)?;
        let ancestor_node = self.node(ancestor)?;
        if node.kind != ancestor_node.kind {
            return Err(DepotError::type_mismatch(format!(
                "cannot compare {} {id} against {} {ancestor} for ancestry",
                node.kind, ancestor_node.kind
            )));
        }
        if !node.is_saved() {
            return Ok(false);
        }
        Ok(self.ancestors(id)?.contains(&ancestor))
    }

    /// Depth of a node below the conceptual root.
    ///
    /// The root itself has level `-1` by convention; top-level nodes have
    /// level `0`. Memoized per node, validated against the forest
    /// generation.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown handle, `CycleDetected` on a corrupted
    /// graph.
    pub fn level(&self, id: NodeId) -> DepotResult<i32> {
        let node = self.node(id)?;
        if let Some((generation, level)) = node.level_cache.get() {
            if generation == self.generation {
                return Ok(level);
            }
        }
        let level = i32::try_from(self.ancestors(id)?.len())
            .map_err(|_| DepotError::internal(format!("tree depth overflow at {id}")))?;
        node.level_cache.set(Some((self.generation, level)));
        Ok(level)
    }

    /// Ordered name list from the root down to the node, including the
    /// node itself. Memoized per node, validated against the forest
    /// generation.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown handle, `CycleDetected` on a corrupted
    /// graph.
    pub fn path_segments(&self, id: NodeId) -> DepotResult<Vec<String>> {
        let node = self.node(id)?;
        if let Some(cache) = node.path_cache.borrow().as_ref() {
            if cache.generation == self.generation {
                return Ok(cache.segments.clone());
            }
        }

        let mut segments = vec![node.name.clone()];
        for ancestor in self.ancestors(id)? {
            segments.push(self.node(ancestor)?.name.clone());
        }
        segments.reverse();

        node.path_cache.replace(Some(PathCache {
            generation: self.generation,
            segments: segments.clone(),
        }));
        Ok(segments)
    }

    /// Full breadcrumb path joined with [`PATH_DELIMITER`].
    ///
    /// # Errors
    ///
    /// See [`Forest::path_segments`].
    pub fn full_path(&self, id: NodeId) -> DepotResult<String> {
        self.full_path_with(id, PATH_DELIMITER)
    }

    /// Full breadcrumb path joined with a caller-chosen delimiter.
    ///
    /// # Errors
    ///
    /// See [`Forest::path_segments`].
    pub fn full_path_with(&self, id: NodeId, delimiter: &str) -> DepotResult<String> {
        Ok(self.path_segments(id)?.join(delimiter))
    }

    /// Children of a node, or its whole subtree.
    ///
    /// Non-recursive: the direct children view, in insertion order.
    /// Recursive: pre-order depth-first accumulation — each child is
    /// followed immediately by its own subtree.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown handle, `CycleDetected` on a corrupted
    /// graph.
    pub fn subelements(&self, id: NodeId, recursive: bool) -> DepotResult<Vec<NodeId>> {
        self.node(id)?;
        let direct: Vec<NodeId> = self
            .children
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        if !recursive {
            return Ok(direct);
        }

        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = direct.into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            if out.len() >= self.nodes.len() {
                return Err(DepotError::cycle_detected(format!(
                    "subtree walk from {id} exceeded {} nodes",
                    self.nodes.len()
                )));
            }
            out.push(next);
            if let Some(grandchildren) = self.children.get(&next) {
                stack.extend(grandchildren.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Number of nodes in the subtree below `id`.
    ///
    /// # Errors
    ///
    /// See [`Forest::subelements`].
    pub fn descendant_count(&self, id: NodeId) -> DepotResult<usize> {
        Ok(self.subelements(id, true)?.len())
    }

    /// Handles of all top-level nodes of a kind, in insertion order.
    pub fn roots(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.kind == kind && node.parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        // The stamp alone would keep stale path strings alive until the
        // next read.
        for node in self.nodes.values() {
            node.clear_caches();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    fn category(name: &str, id: u64) -> StructuralNode {
        StructuralNode::new(NodeKind::Category, name).with_id(EntityId(id))
    }

    /// Resistors → THT → 0.25W, as saved categories.
    fn sample_chain(forest: &mut Forest) -> (NodeId, NodeId, NodeId) {
        let a = forest.insert(category("Resistors", 1)).unwrap();
        let b = forest
            .insert(category("THT", 2).with_parent(a))
            .unwrap();
        let c = forest
            .insert(category("0.25W", 3).with_parent(b))
            .unwrap();
        (a, b, c)
    }

    #[test]
    fn test_full_path_root_first() {
        let mut forest = Forest::new();
        let (_, _, c) = sample_chain(&mut forest);
        assert_eq!(forest.full_path(c).unwrap(), "Resistors → THT → 0.25W");
    }

    #[test]
    fn test_full_path_custom_delimiter() {
        let mut forest = Forest::new();
        let (_, _, c) = sample_chain(&mut forest);
        assert_eq!(forest.full_path_with(c, " / ").unwrap(), "Resistors / THT / 0.25W");
    }

    #[test]
    fn test_levels_follow_parent_plus_one() {
        let mut forest = Forest::new();
        let (a, b, c) = sample_chain(&mut forest);
        assert_eq!(forest.level(a).unwrap(), 0);
        assert_eq!(forest.level(b).unwrap(), 1);
        assert_eq!(forest.level(c).unwrap(), 2);
    }

    #[test]
    fn test_parent_entity_id_root_sentinel() {
        let mut forest = Forest::new();
        let (a, b, _) = sample_chain(&mut forest);
        assert_eq!(forest.parent_entity_id(a).unwrap(), EntityId::ROOT);
        assert_eq!(forest.parent_entity_id(b).unwrap(), EntityId(1));
    }

    #[test]
    fn test_is_child_of_direct_and_transitive() {
        let mut forest = Forest::new();
        let (a, b, c) = sample_chain(&mut forest);
        assert!(forest.is_child_of(c, b).unwrap());
        assert!(forest.is_child_of(c, a).unwrap());
        assert!(!forest.is_child_of(a, c).unwrap());
    }

    #[test]
    fn test_is_child_of_unsaved_node_is_false() {
        let mut forest = Forest::new();
        let a = forest.insert(category("Resistors", 1)).unwrap();
        let placeholder = forest
            .insert(StructuralNode::new(NodeKind::Category, "draft").with_parent(a))
            .unwrap();
        assert!(!forest.is_child_of(placeholder, a).unwrap());
    }

    #[test]
    fn test_is_child_of_kind_mismatch_is_error() {
        let mut forest = Forest::new();
        let cat = forest.insert(category("Resistors", 1)).unwrap();
        let loc = forest
            .insert(StructuralNode::new(NodeKind::StorageLocation, "Shelf A").with_id(EntityId(1)))
            .unwrap();
        let err = forest.is_child_of(cat, loc).unwrap_err();
        assert!(matches!(err, DepotError::TypeMismatch { .. }));
    }

    #[test]
    fn test_insert_rejects_cross_kind_parent() {
        let mut forest = Forest::new();
        let cat = forest.insert(category("Resistors", 1)).unwrap();
        let err = forest
            .insert(StructuralNode::new(NodeKind::StorageLocation, "Shelf A").with_parent(cat))
            .unwrap_err();
        assert!(matches!(err, DepotError::TypeMismatch { .. }));
    }

    #[test]
    fn test_subelements_direct() {
        let mut forest = Forest::new();
        let r = forest.insert(category("root", 1)).unwrap();
        let x = forest.insert(category("x", 2).with_parent(r)).unwrap();
        let y = forest.insert(category("y", 3).with_parent(r)).unwrap();
        let _z = forest.insert(category("z", 4).with_parent(x)).unwrap();
        assert_eq!(forest.subelements(r, false).unwrap(), vec![x, y]);
    }

    #[test]
    fn test_subelements_recursive_preorder_no_duplicates() {
        let mut forest = Forest::new();
        let r = forest.insert(category("root", 1)).unwrap();
        let x = forest.insert(category("x", 2).with_parent(r)).unwrap();
        let y = forest.insert(category("y", 3).with_parent(r)).unwrap();
        let z = forest.insert(category("z", 4).with_parent(x)).unwrap();
        let subtree = forest.subelements(r, true).unwrap();
        assert_eq!(subtree, vec![x, z, y]);
        assert_eq!(forest.descendant_count(r).unwrap(), 3);
    }

    #[test]
    fn test_set_parent_rejects_self_loop() {
        let mut forest = Forest::new();
        let a = forest.insert(category("a", 1)).unwrap();
        let err = forest.set_parent(a, Some(a)).unwrap_err();
        assert!(matches!(err, DepotError::CycleDetected { .. }));
    }

    #[test]
    fn test_set_parent_rejects_descendant() {
        let mut forest = Forest::new();
        let (a, _, c) = sample_chain(&mut forest);
        let err = forest.set_parent(a, Some(c)).unwrap_err();
        assert!(matches!(err, DepotError::CycleDetected { .. }));
        // The tree is unchanged after the rejected move.
        assert!(forest.parent(a).unwrap().is_none());
    }

    #[test]
    fn test_set_parent_reparents_and_updates_children() {
        let mut forest = Forest::new();
        let r = forest.insert(category("root", 1)).unwrap();
        let x = forest.insert(category("x", 2).with_parent(r)).unwrap();
        let y = forest.insert(category("y", 3).with_parent(r)).unwrap();
        forest.set_parent(y, Some(x)).unwrap();
        assert_eq!(forest.subelements(r, false).unwrap(), vec![x]);
        assert_eq!(forest.subelements(x, false).unwrap(), vec![y]);
        assert_eq!(forest.level(y).unwrap(), 2);
    }

    #[test]
    fn test_rename_invalidates_path_cache() {
        let mut forest = Forest::new();
        let (a, _, c) = sample_chain(&mut forest);
        assert_eq!(forest.full_path(c).unwrap(), "Resistors → THT → 0.25W");
        forest.rename(a, "Passives").unwrap();
        assert_eq!(forest.full_path(c).unwrap(), "Passives → THT → 0.25W");
    }

    #[test]
    fn test_level_cache_survives_unrelated_reads() {
        let mut forest = Forest::new();
        let (_, _, c) = sample_chain(&mut forest);
        assert_eq!(forest.level(c).unwrap(), 2);
        assert_eq!(forest.level(c).unwrap(), 2);
    }

    #[test]
    fn test_reparent_invalidates_level_cache() {
        let mut forest = Forest::new();
        let (a, _, c) = sample_chain(&mut forest);
        assert_eq!(forest.level(c).unwrap(), 2);
        forest.set_parent(c, Some(a)).unwrap();
        assert_eq!(forest.level(c).unwrap(), 1);
    }

    #[test]
    fn test_roots_filters_by_kind() {
        let mut forest = Forest::new();
        let cat = forest.insert(category("Resistors", 1)).unwrap();
        let _loc = forest
            .insert(StructuralNode::new(NodeKind::StorageLocation, "Shelf A").with_id(EntityId(1)))
            .unwrap();
        assert_eq!(forest.roots(NodeKind::Category), vec![cat]);
    }

    #[test]
    fn test_unknown_handle_is_not_found() {
        let forest = Forest::new();
        let err = forest.level(NodeId(99)).unwrap_err();
        assert!(matches!(err, DepotError::NotFound { .. }));
    }
}
