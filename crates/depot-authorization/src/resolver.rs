//! Permission resolution chain
//!
//! Resolves one operation to a definitive allow/disallow decision by
//! walking user → assigned group → the group's ancestors → root. The
//! first terminal (non-inherit) value wins; an all-inherit chain falls
//! back to the resolver's configured default.

use crate::operations::Operation;
use crate::principal::{GroupDirectory, User};
use crate::register::PermissionValue;
use depot_core::{DepotError, DepotResult, Forest, NodeKind};
use tracing::trace;

/// State of one resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Terminal: the operation is granted.
    Allowed,
    /// Terminal: the operation is denied.
    Disallowed,
    /// Continue with the next principal in the chain.
    Undecided,
}

impl From<PermissionValue> for Resolution {
    fn from(value: PermissionValue) -> Self {
        match value {
            PermissionValue::Allow => Self::Allowed,
            PermissionValue::Disallow => Self::Disallowed,
            PermissionValue::Inherit => Self::Undecided,
        }
    }
}

impl Resolution {
    /// Terminal decision, if any.
    pub fn decision(self) -> Option<bool> {
        match self {
            Self::Allowed => Some(true),
            Self::Disallowed => Some(false),
            Self::Undecided => None,
        }
    }
}

/// The authorization decision engine.
///
/// The root-of-chain fallback is an explicit policy here rather than
/// implicit behavior; the default is deny.
#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver {
    /// Decision returned when the whole chain is undecided.
    pub default_decision: bool,
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self {
            default_decision: false,
        }
    }
}

impl PermissionResolver {
    /// Create a resolver with an explicit root-of-chain default.
    pub fn new(default_decision: bool) -> Self {
        Self { default_decision }
    }

    /// Resolve one operation to a definitive boolean.
    ///
    /// Never returns "unknown": an all-inherit chain yields the
    /// configured default.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the user's group handle is not a group node,
    /// `NotFound` for a dangling handle, `CycleDetected` on a corrupted
    /// group tree.
    pub fn resolve(
        &self,
        forest: &Forest,
        groups: &GroupDirectory,
        user: &User,
        op: Operation,
    ) -> DepotResult<bool> {
        let decision = self
            .resolve_value(forest, groups, user, op)?
            .unwrap_or(self.default_decision);
        trace!(user = %user.id, %op, decision, "resolved permission");
        Ok(decision)
    }

    /// Resolve one operation, stopping before the default is applied.
    ///
    /// `None` means the whole chain inherited; presentation layers use
    /// this to render "inherited" distinctly from an explicit decision.
    ///
    /// # Errors
    ///
    /// See [`PermissionResolver::resolve`].
    pub fn resolve_value(
        &self,
        forest: &Forest,
        groups: &GroupDirectory,
        user: &User,
        op: Operation,
    ) -> DepotResult<Option<bool>> {
        if let Some(decision) = Resolution::from(user.register.value(op)?).decision() {
            trace!(user = %user.id, %op, decision, "user register is terminal");
            return Ok(Some(decision));
        }

        let Some(group) = user.group else {
            return Ok(None);
        };
        let group_node = forest.node(group)?;
        if group_node.kind != NodeKind::Group {
            return Err(DepotError::type_mismatch(format!(
                "{} of user {} is a {} node, not a Group",
                group, user.id, group_node.kind
            )));
        }

        if let Some(decision) = Resolution::from(groups.value(group, op)?).decision() {
            trace!(user = %user.id, %group, %op, decision, "group register is terminal");
            return Ok(Some(decision));
        }

        for ancestor in forest.ancestors(group)? {
            if let Some(decision) = Resolution::from(groups.value(ancestor, op)?).decision() {
                trace!(user = %user.id, ancestor = %ancestor, %op, decision, "ancestor group is terminal");
                return Ok(Some(decision));
            }
        }

        trace!(user = %user.id, %op, "chain fully inherited");
        Ok(None)
    }
}
