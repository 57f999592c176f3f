// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Morphic Tree: a Kurbo-native arena tree for retained-mode scene graphs.
//!
//! - Nodes live in a generational arena and carry a caller-defined payload.
//! - Children are ordered back to front; the last child is topmost for painting and hit testing.
//! - Geometry is kept in surface space: moving a node moves its whole subtree.
//! - Provides full-bounds computation, point hit testing with transparent click-through,
//!   z-ordered paint lists for a damage rectangle, and a [`Damage`] accumulator.
//!
//! The tree never paints and never records damage on its own: structural and
//! geometric mutators only change data. Whoever mutates the tree decides what
//! to invalidate.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing nodes, structure and queries.
//! - [`NodeGeometry`]: per-node bounds, decoration outset and [`NodeFlags`].
//! - [`NodeId`]: generational handle of a node.
//! - [`Damage`]: rounded, zero-area-free list of rectangles awaiting repaint.
//! - [`TreeError`]: why a structural or geometric change was refused.
//!
//! ## Minimal usage
//!
//! ```
//! use morphic_tree::{NodeGeometry, Tree};
//! use kurbo::{Point, Rect};
//!
//! let mut tree: Tree<&str> = Tree::new();
//! let root = tree.insert(NodeGeometry::with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)), "root");
//! let a = tree.insert(NodeGeometry::with_bounds(Rect::new(10.0, 10.0, 60.0, 60.0)), "a");
//! let b = tree.insert(NodeGeometry::with_bounds(Rect::new(40.0, 40.0, 120.0, 120.0)), "b");
//! tree.add_child(root, a).unwrap();
//! tree.add_child(root, b).unwrap();
//!
//! // `b` was added last, so it is on top where the two overlap.
//! let hit = tree.hit_test(root, Point::new(50.0, 50.0), |_, _, _| false).unwrap();
//! assert_eq!(hit.node, b);
//! assert_eq!(hit.path, vec![root, b]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod error;
mod tree;
mod types;

pub use damage::Damage;
pub use error::TreeError;
pub use tree::{Hit, PaintItem, Tree};
pub use types::{NodeFlags, NodeGeometry, NodeId, has_area, normalize_rect};
