// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the morph tree: node identifiers, flags, and geometry.

use kurbo::{Insets, Rect};

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable while the node is alive
/// and becomes stale when the node is removed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale ids never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this id, stable for the lifetime of the node.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Generation of this id.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in painting and hit testing).
        const VISIBLE  = 0b0000_0001;
        /// Node and its subtree participate in hit testing.
        const PICKABLE = 0b0000_0010;
        /// Node claims points where its own image is transparent.
        ///
        /// Without this flag a node lets clicks on transparent pixels fall
        /// through to whatever lies underneath.
        const NOTICES_TRANSPARENT_CLICK = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE | Self::NOTICES_TRANSPARENT_CLICK
    }
}

/// Surface-space geometry of a node.
#[derive(Clone, Debug)]
pub struct NodeGeometry {
    /// Logical box in surface coordinates. Always normalized (non-negative extent).
    pub bounds: Rect,
    /// Visual extent drawn outside `bounds`, e.g. a drop shadow.
    ///
    /// Counted by [`Tree::full_bounds`](crate::Tree::full_bounds) and painting, never by hit testing.
    pub outset: Insets,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
}

impl Default for NodeGeometry {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            outset: Insets::ZERO,
            flags: NodeFlags::default(),
        }
    }
}

impl NodeGeometry {
    /// Geometry with the given bounds and default flags.
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            bounds: normalize_rect(bounds),
            ..Default::default()
        }
    }

    /// Bounds grown by the decoration outset.
    pub fn painted_bounds(&self) -> Rect {
        self.bounds + self.outset
    }
}

/// Clamp negative extents to zero area, keeping the origin.
///
/// Input math can produce rectangles whose corner lies above or left of the
/// origin; these are never passed on to drawing or hit testing.
pub fn normalize_rect(r: Rect) -> Rect {
    Rect::new(r.x0, r.y0, r.x1.max(r.x0), r.y1.max(r.y0))
}

/// True when the rectangle covers at least some area.
pub fn has_area(r: Rect) -> bool {
    r.width() > 0.0 && r.height() > 0.0
}
