//! Structural node types
//!
//! Every organizational entity in Depot (category, storage location,
//! footprint, …) is a node in a self-referencing tree of its own kind.
//! Nodes carry no children themselves; the children view is a derived
//! index maintained by the [`Forest`](super::Forest) that owns them.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;

/// Arena handle for a node inside a [`Forest`](super::Forest).
///
/// Handles are assigned by the forest and are stable for the lifetime of
/// the in-memory arena. They are unrelated to persistent identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node#{}", self.0)
    }
}

/// Persistent identifier assigned by the store collaborator.
///
/// Unique within a concrete node kind. A node that has never been saved
/// carries no `EntityId` yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Root sentinel: the conceptual top of every tree.
    ///
    /// The root is never materialized as a node; an absent parent
    /// reference resolves to this identifier.
    pub const ROOT: EntityId = EntityId(0);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity#{}", self.0)
    }
}

/// Concrete kind of a structural node.
///
/// A node's parent is always of the same kind; comparing ancestry across
/// kinds is a [`TypeMismatch`](crate::DepotError::TypeMismatch) error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Part category
    Category,
    /// Physical storage location
    StorageLocation,
    /// Component footprint
    Footprint,
    /// Measuring or lab device
    Device,
    /// Part manufacturer
    Manufacturer,
    /// Part supplier
    Supplier,
    /// User group (also a permission principal)
    Group,
    /// Attachment type
    AttachmentType,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Category => "Category",
            Self::StorageLocation => "StorageLocation",
            Self::Footprint => "Footprint",
            Self::Device => "Device",
            Self::Manufacturer => "Manufacturer",
            Self::Supplier => "Supplier",
            Self::Group => "Group",
            Self::AttachmentType => "AttachmentType",
        };
        f.write_str(label)
    }
}

/// Cached full-path segments, stamped with the forest generation that
/// produced them. A stamp that no longer matches the forest means some
/// rename or reparent happened since; the cache is recomputed.
#[derive(Debug, Clone, Default)]
pub(crate) struct PathCache {
    pub(crate) generation: u64,
    pub(crate) segments: Vec<String>,
}

/// A tree-organized domain entity: name, optional parent, derived children.
///
/// Level and full-path caches are per-instance memoization only; they are
/// never serialized and are validated against the owning forest's
/// generation counter before being trusted. Interior mutability keeps the
/// read API `&self`; the subsystem is single-threaded by contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralNode {
    /// Concrete kind; fixed at construction.
    pub kind: NodeKind,
    /// Persistent identifier, `None` while unsaved.
    pub id: Option<EntityId>,
    /// Display name.
    pub name: String,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Back-reference to the parent node of the same kind.
    /// `None` means the parent is the conceptual root.
    pub(crate) parent: Option<NodeId>,

    #[serde(skip)]
    pub(crate) level_cache: Cell<Option<(u64, i32)>>,
    #[serde(skip)]
    pub(crate) path_cache: RefCell<Option<PathCache>>,
}

impl StructuralNode {
    /// Create an unsaved node with no parent (top-level under the root).
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: None,
            name: name.into(),
            comment: None,
            parent: None,
            level_cache: Cell::new(None),
            path_cache: RefCell::new(None),
        }
    }

    /// Set the persistent identifier. Builder pattern.
    #[must_use]
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the comment. Builder pattern.
    ///
    /// Empty strings are normalized to `None`.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = if comment.is_empty() {
            None
        } else {
            Some(comment)
        };
        self
    }

    /// Set the parent handle. Builder pattern.
    ///
    /// The forest validates kind and acyclicity at insert time.
    #[must_use]
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Parent handle, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether the node has been assigned a persistent identifier.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Drop both memoized caches.
    pub(crate) fn clear_caches(&self) {
        self.level_cache.set(None);
        self.path_cache.replace(None);
    }
}
