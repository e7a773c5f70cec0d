//! Depot Authorization — bit-packed, inheritable permissions
//!
//! Every principal (user or group) carries a [`PermissionRegister`]: a
//! fixed set of packed integer fields holding 2-bit tri-state codes,
//! one per [`Operation`]. Groups are structural nodes in a
//! [`Forest`](depot_core::Forest); the [`PermissionResolver`] walks
//! user → group → ancestor groups and returns the first terminal
//! decision, falling back to a configurable default at the root.
//!
//! The store boundary uses optimistic compare-and-swap field writes so
//! concurrent edits to different slots of the same packed field cannot
//! silently clobber each other.

#![forbid(unsafe_code)]

/// 2-bit pair codec for packed fields
pub mod codec;

/// Unified error handling (re-exported from depot-core)
pub mod errors;

/// Closed field and operation enumerations
pub mod operations;

/// Users, groups, and their registers
pub mod principal;

/// Permission registers and tri-state values
pub mod register;

/// The resolution chain
pub mod resolver;

/// Store boundary with optimistic field writes
pub mod store;

pub use codec::BitWidth;
pub use errors::{DepotError, DepotResult};
pub use operations::{Operation, PermissionField};
pub use principal::{GroupDirectory, User, UserId};
pub use register::{PermissionRegister, PermissionValue};
pub use resolver::{PermissionResolver, Resolution};
pub use store::{
    load_register, set_permission, MemoryPermissionStore, PermissionStore, PrincipalRef,
    MAX_WRITE_ATTEMPTS,
};
