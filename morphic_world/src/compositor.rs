// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage tracking and flushing.
//!
//! Every visual change records the affected morph's full bounds, rounded
//! outward, in the world's damage list. A flush takes the list and, for each
//! rectangle, repaints the world subtree and then the hand subtree clipped to
//! that rectangle. Damage recorded while flushing waits for the next flush.

use kurbo::{Point, Rect};
use morphic_tree::{Damage, has_area};

use crate::cx::DrawCx;
use crate::error::{SurfaceError, WorldError};
use crate::morph::MorphId;
use crate::surface::Surface;
use crate::world::World;

/// Damage accumulated since the last flush.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    broken: Damage,
}

impl Compositor {
    /// Record `rect` as needing repaint. Returns `false` if it was dropped
    /// for having no area.
    pub fn invalidate(&mut self, rect: Rect) -> bool {
        self.broken.add(rect)
    }

    /// Damage waiting for the next flush.
    pub fn broken(&self) -> &[Rect] {
        self.broken.rects()
    }

    pub(crate) fn take(&mut self) -> Vec<Rect> {
        self.broken.take()
    }

    pub(crate) fn requeue(&mut self, rects: impl IntoIterator<Item = Rect>) {
        self.broken.extend(rects);
    }
}

/// What a flush did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Damage rectangles repainted.
    pub rects: usize,
    /// Damage rectangles skipped for lying outside the surface.
    pub skipped: usize,
    /// Successful `draw_on` calls.
    pub draws: usize,
    /// `draw_on` calls that failed recoverably.
    pub failed_draws: usize,
}

impl World {
    /// Record the current full bounds of `id` as damaged.
    ///
    /// No-op unless `id` is attached under the world root or the hand.
    /// Call it before and after changing anything `id` looks like.
    pub fn changed(&mut self, id: MorphId) {
        if !self.is_live(id) {
            return;
        }
        if let Some(fb) = self.tree.full_bounds(id) {
            self.compositor.invalidate(fb);
        }
    }

    /// Record an arbitrary surface region as damaged.
    pub fn invalidate(&mut self, rect: Rect) {
        self.compositor.invalidate(rect);
    }

    /// Damage waiting for the next flush.
    pub fn broken(&self) -> &[Rect] {
        self.compositor.broken()
    }

    /// Repaint every damaged region onto `surface`.
    ///
    /// Recoverable draw errors are logged and skipped. A lost surface aborts
    /// the flush; the rectangles not yet repainted, including the one being
    /// drawn, are queued again.
    pub fn flush(&mut self, surface: &mut dyn Surface) -> Result<FlushReport, WorldError> {
        let rects = self.compositor.take();
        let screen = Rect::from_origin_size(Point::ORIGIN, surface.size());
        let mut report = FlushReport::default();
        for (i, damaged) in rects.iter().enumerate() {
            let rect = damaged.intersect(screen);
            if !has_area(rect) {
                report.skipped += 1;
                continue;
            }
            for layer in [self.root, self.hand.node] {
                if let Err(err) = self.paint_layer(layer, rect, surface, &mut report) {
                    log::warn!("flush aborted: {err}");
                    self.compositor.requeue(rects[i..].iter().copied());
                    return Err(WorldError::Surface(err));
                }
            }
            report.rects += 1;
        }
        log::trace!("flushed {report:?}");
        Ok(report)
    }

    fn paint_layer(
        &self,
        layer: MorphId,
        rect: Rect,
        surface: &mut dyn Surface,
        report: &mut FlushReport,
    ) -> Result<(), SurfaceError> {
        for item in self.tree.paint_list(layer, rect) {
            let (Some(state), Some(bounds)) = (self.tree.get(item.node), self.tree.bounds(item.node))
            else {
                continue;
            };
            let Some(behavior) = state.behavior.as_deref() else {
                continue;
            };
            let cx = DrawCx {
                id: item.node,
                bounds,
                image: state.image.as_ref(),
                color: state.color,
                alpha: state.alpha,
            };
            match behavior.draw_on(&cx, surface, item.clip) {
                Ok(()) => report.draws += 1,
                Err(err) if err.is_recoverable() => {
                    log::warn!("drawing {:?} failed: {err}", item.node);
                    report.failed_draws += 1;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}
