// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types of the engine.

use morphic_tree::TreeError;

/// Failure reported by a [`Surface`](crate::Surface) draw call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The surface is gone (context lost, window closed). Nothing more can be drawn.
    #[error("surface lost")]
    Lost,
    /// A single draw call failed; later calls may still succeed.
    #[error("draw call failed: {0}")]
    Draw(String),
}

impl SurfaceError {
    /// Whether the compositor may keep drawing after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Lost)
    }
}

/// Failure of a morph's `layout` hook.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The morph could not resolve its geometry.
    #[error("layout could not be resolved: {0}")]
    Unresolved(String),
    /// The resolved bounds were rejected by the tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Error returned to the host by [`World::run_one_cycle`](crate::World::run_one_cycle).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The surface failed in a way the compositor cannot recover from.
    /// The unpainted damage stays queued for the next flush.
    #[error("compositing aborted: {0}")]
    Surface(#[from] SurfaceError),
}
