//! Store boundary for permission fields
//!
//! A permission field is one integer column holding many independent
//! slots, so two edits to different operations in the same field race at
//! field granularity. Writes here are optimistic: the caller states the
//! value it read, and the store rejects the write with `Conflict` when
//! that expectation is stale. [`set_permission`] wraps the
//! read-modify-write loop with a bounded retry.

use crate::codec;
use crate::operations::{Operation, PermissionField};
use crate::principal::UserId;
use crate::register::{PermissionRegister, PermissionValue};
use depot_core::{DepotError, DepotResult, NodeId};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Attempts [`set_permission`] makes before giving up on a contended
/// field.
pub const MAX_WRITE_ATTEMPTS: u32 = 4;

/// Identifies the principal owning a permission field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalRef {
    /// A user account.
    User(UserId),
    /// A group node.
    Group(NodeId),
}

impl fmt::Display for PrincipalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::Group(id) => write!(f, "group {id}"),
        }
    }
}

/// Loads and stores packed permission fields.
///
/// `store_field` is compare-and-swap shaped: it succeeds only when the
/// field still holds `expected`, so a concurrent edit to a different
/// slot of the same field can never be silently discarded.
pub trait PermissionStore {
    /// Current raw value of a principal's field. Absent fields read as
    /// zero (everything inherits).
    fn load_field(&self, principal: PrincipalRef, field: PermissionField) -> DepotResult<u64>;

    /// Replace a field if it still holds `expected`.
    ///
    /// # Errors
    ///
    /// `Conflict` when the stored value no longer matches `expected`.
    fn store_field(
        &self,
        principal: PrincipalRef,
        field: PermissionField,
        expected: u64,
        new: u64,
    ) -> DepotResult<()>;
}

/// Set one operation's tri-state value through a store.
///
/// Re-reads the field and retries on `Conflict`, up to
/// [`MAX_WRITE_ATTEMPTS`] times.
///
/// # Errors
///
/// `Conflict` if the field stays contended through every attempt; other
/// store failures propagate unchanged.
pub fn set_permission(
    store: &dyn PermissionStore,
    principal: PrincipalRef,
    op: Operation,
    value: PermissionValue,
) -> DepotResult<()> {
    let (field, offset) = op.slot();
    let mut attempt = 0;
    loop {
        let current = store.load_field(principal, field)?;
        let updated = codec::write_bit_pair(current, offset, value.to_bits(), field.width())?;
        match store.store_field(principal, field, current, updated) {
            Ok(()) => return Ok(()),
            Err(DepotError::Conflict { .. }) if attempt + 1 < MAX_WRITE_ATTEMPTS => {
                attempt += 1;
                warn!(%principal, %field, attempt, "permission field write lost the race, retrying");
            }
            Err(err) => return Err(err),
        }
    }
}

/// Assemble a full register from a principal's stored fields.
///
/// # Errors
///
/// Store failures propagate unchanged.
pub fn load_register(
    store: &dyn PermissionStore,
    principal: PrincipalRef,
) -> DepotResult<PermissionRegister> {
    let mut register = PermissionRegister::new();
    for field in PermissionField::ALL {
        register.set_raw_field(*field, store.load_field(principal, *field)?)?;
    }
    Ok(register)
}

/// In-memory permission store for tests and simulators.
///
/// Single-threaded, matching the subsystem's execution model; interior
/// mutability keeps the trait's `&self` signatures.
#[derive(Debug, Default)]
pub struct MemoryPermissionStore {
    fields: RefCell<HashMap<(PrincipalRef, PermissionField), u64>>,
}

impl MemoryPermissionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PermissionStore for MemoryPermissionStore {
    fn load_field(&self, principal: PrincipalRef, field: PermissionField) -> DepotResult<u64> {
        Ok(self
            .fields
            .borrow()
            .get(&(principal, field))
            .copied()
            .unwrap_or(0))
    }

    fn store_field(
        &self,
        principal: PrincipalRef,
        field: PermissionField,
        expected: u64,
        new: u64,
    ) -> DepotResult<()> {
        let mut fields = self.fields.borrow_mut();
        let slot = fields.entry((principal, field)).or_insert(0);
        if *slot != expected {
            return Err(DepotError::conflict(format!(
                "{principal} {field}: expected {expected:#x}, found {:#x}",
                *slot
            )));
        }
        *slot = new;
        Ok(())
    }
}
