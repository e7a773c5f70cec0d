//! Error handling using the unified Depot error system
//!
//! Re-exports the core error types instead of defining crate-local
//! ones, keeping one taxonomy across the workspace.

pub use depot_core::{DepotError, DepotResult};
