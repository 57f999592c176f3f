// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage accumulation between flushes.

use alloc::vec::Vec;
use kurbo::Rect;

use crate::types::has_area;

/// Rectangles awaiting repaint, accumulated since the last [`Damage::take`].
///
/// `Damage` is intentionally coarse: rectangles may overlap and are not
/// deduplicated. Every recorded rectangle is rounded outward to whole pixels
/// (origin floored, corner ceiled) so adjacent repaints never leave sub-pixel
/// seams, and rectangles without area are never recorded.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Create an empty damage list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `rect`, rounded outward. Returns `false` if it was dropped for having no area.
    pub fn add(&mut self, rect: Rect) -> bool {
        if !rect.is_finite() {
            return false;
        }
        let r = rect.expand();
        if !has_area(r) {
            return false;
        }
        self.dirty_rects.push(r);
        true
    }

    /// Record several rectangles.
    pub fn extend(&mut self, rects: impl IntoIterator<Item = Rect>) {
        for r in rects {
            self.add(r);
        }
    }

    /// Take every recorded rectangle, leaving the list empty.
    pub fn take(&mut self) -> Vec<Rect> {
        core::mem::take(&mut self.dirty_rects)
    }

    /// Recorded rectangles in insertion order.
    pub fn rects(&self) -> &[Rect] {
        &self.dirty_rects
    }

    /// Number of recorded rectangles.
    pub fn len(&self) -> usize {
        self.dirty_rects.len()
    }

    /// True if nothing needs repainting.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}
