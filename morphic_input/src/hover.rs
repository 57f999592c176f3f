// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state: edge-triggered enter/leave transitions from path changes.
//!
//! Feed the root→target path under the pointer after every move; the state
//! answers with the minimal set of leave and enter transitions. A node that
//! stays under the pointer never sees a second enter.
//!
//! ```
//! use morphic_input::hover::{HoverState, HoverEvent};
//! let mut h: HoverState<u32> = HoverState::new();
//! assert_eq!(h.update_path(&[1, 2]), vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]);
//! assert_eq!(h.update_path(&[1, 3]), vec![HoverEvent::Leave(2), HoverEvent::Enter(3)]);
//! assert!(h.update_path(&[1, 3]).is_empty());
//! ```

use alloc::vec::Vec;

/// The hovered root→target path and its transitions.
///
/// Ordering semantics:
/// - Leave events are emitted from inner-most to outer-most.
/// - Enter events are emitted from outer-most to inner-most.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Vec<K>,
}

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// Pointer entered the node.
    Enter(K),
    /// Pointer left the node.
    Leave(K),
}

impl<K: Copy + Eq> HoverState<K> {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The current root→target path.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Clear the path, returning leave events inner→outer.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        let out = self.current.iter().rev().map(|&k| HoverEvent::Leave(k)).collect();
        self.current.clear();
        out
    }

    /// Drop `node` and everything below it from the path without emitting events.
    ///
    /// Used when a hovered node is destroyed: it can no longer be told it was left.
    pub fn forget(&mut self, node: K) {
        if let Some(i) = self.current.iter().position(|k| *k == node) {
            self.current.truncate(i);
        }
    }

    /// Replace the hovered path and return the transitions to get there.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        // Length of the shared ancestry.
        let shared = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out: Vec<HoverEvent<K>> = self.current[shared..]
            .iter()
            .rev()
            .map(|&k| HoverEvent::Leave(k))
            .collect();
        out.extend(new_path[shared..].iter().map(|&k| HoverEvent::Enter(k)));

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}
