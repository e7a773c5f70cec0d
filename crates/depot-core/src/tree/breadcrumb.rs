//! Breadcrumb trails for presentation layers
//!
//! Thin helper over the same ancestor walk that powers
//! [`Forest::path_segments`](super::Forest::path_segments), but keeping
//! per-node handles so each crumb can link somewhere.

use crate::errors::DepotResult;
use crate::tree::node::NodeId;
use crate::tree::Forest;
use serde::{Deserialize, Serialize};

/// One entry in a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Display label for the crumb.
    pub label: String,
    /// Link target; `None` for the conceptual-root entry.
    pub target: Option<NodeId>,
}

impl Forest {
    /// Breadcrumb trail from the conceptual root down to `id`.
    ///
    /// Built by walking `id → parent → … → root` into a temporary list
    /// and reversing it, exactly mirroring the full-path construction.
    /// With `show_root` the trail starts with a linkless crumb labelled
    /// `root_label`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown handle, `CycleDetected` on a corrupted
    /// graph.
    pub fn breadcrumbs(
        &self,
        id: NodeId,
        root_label: &str,
        show_root: bool,
    ) -> DepotResult<Vec<Breadcrumb>> {
        let mut trail = vec![Breadcrumb {
            label: self.node(id)?.name.clone(),
            target: Some(id),
        }];
        for ancestor in self.ancestors(id)? {
            trail.push(Breadcrumb {
                label: self.node(ancestor)?.name.clone(),
                target: Some(ancestor),
            });
        }
        if show_root {
            trail.push(Breadcrumb {
                label: root_label.to_owned(),
                target: None,
            });
        }
        trail.reverse();
        Ok(trail)
    }
}
