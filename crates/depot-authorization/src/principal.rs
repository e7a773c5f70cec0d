//! Principals: users and groups
//!
//! A principal owns exactly one [`PermissionRegister`]. Users may be
//! assigned to a group; groups are structural nodes
//! ([`NodeKind::Group`](depot_core::NodeKind::Group)) in a forest, and
//! their tree position drives permission inheritance.

use crate::operations::Operation;
use crate::register::{PermissionRegister, PermissionValue};
use depot_core::{DepotResult, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Persistent identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User#{}", self.0)
    }
}

/// A user account with its own permission register and optional group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Persistent identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// The user's own permission register; overrides the group chain.
    pub register: PermissionRegister,
    /// Handle of the user's group node, if assigned.
    pub group: Option<NodeId>,
}

impl User {
    /// Create a user with an all-inherit register and no group.
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            register: PermissionRegister::new(),
            group: None,
        }
    }

    /// Assign the user to a group node. Builder pattern.
    #[must_use]
    pub fn with_group(mut self, group: NodeId) -> Self {
        self.group = Some(group);
        self
    }
}

/// Permission registers of the group nodes in a forest.
///
/// A group with no attached register inherits everything, same as a
/// freshly created principal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupDirectory {
    registers: HashMap<NodeId, PermissionRegister>,
}

impl GroupDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach (or replace) a group's register.
    pub fn attach(&mut self, group: NodeId, register: PermissionRegister) {
        self.registers.insert(group, register);
    }

    /// Remove a group's register, reverting it to all-inherit.
    pub fn detach(&mut self, group: NodeId) -> Option<PermissionRegister> {
        self.registers.remove(&group)
    }

    /// Borrow a group's register, if it has one.
    pub fn register(&self, group: NodeId) -> Option<&PermissionRegister> {
        self.registers.get(&group)
    }

    /// Mutable register access, creating an all-inherit one on demand.
    pub fn register_mut(&mut self, group: NodeId) -> &mut PermissionRegister {
        self.registers.entry(group).or_default()
    }

    /// Decode one operation for a group.
    ///
    /// Groups without a register inherit.
    ///
    /// # Errors
    ///
    /// Mirrors the codec contract; cannot fail for slots from the fixed
    /// table.
    pub fn value(&self, group: NodeId, op: Operation) -> DepotResult<PermissionValue> {
        match self.registers.get(&group) {
            Some(register) => register.value(op),
            None => Ok(PermissionValue::Inherit),
        }
    }
}
