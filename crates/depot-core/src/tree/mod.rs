//! Hierarchical structural model
//!
//! Every organizational entity (category, storage location, footprint,
//! device, manufacturer, supplier, group, attachment type) is a node in
//! a self-referencing tree of its own kind. The [`Forest`] arena owns
//! the nodes and implements path/level resolution, ancestry tests,
//! subtree enumeration, and breadcrumb construction.

pub mod breadcrumb;
pub mod forest;
pub mod node;

pub use breadcrumb::Breadcrumb;
pub use forest::{Forest, PATH_DELIMITER};
pub use node::{EntityId, NodeId, NodeKind, StructuralNode};
