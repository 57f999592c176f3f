// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by structural and geometric tree operations.

use crate::types::NodeId;

/// Reasons a tree operation was refused.
///
/// A refused operation leaves the tree untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id does not refer to a live node.
    #[error("stale node id {0:?}")]
    Stale(NodeId),
    /// The child is the parent itself or one of its ancestors.
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
    /// The node is not a child of the given parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Supposed parent.
        parent: NodeId,
        /// Supposed child.
        child: NodeId,
    },
    /// The owner of the tree reserves this link for itself.
    #[error("linking {child:?} under {parent:?} is reserved")]
    Reserved {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
    /// Bounds contained NaN or infinite coordinates.
    #[error("bounds for {0:?} are not finite")]
    NonFiniteBounds(NodeId),
}
