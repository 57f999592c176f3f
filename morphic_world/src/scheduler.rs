// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame cycle: stepping, animations, input, flush.

use core::mem;

use kurbo::Point;

use crate::animation::{Animation, AnimationId, Easing};
use crate::compositor::FlushReport;
use crate::error::WorldError;
use crate::morph::MorphId;
use crate::surface::Surface;
use crate::world::World;

/// What the scheduler pass of a cycle did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Morphs whose `step` ran.
    pub stepped: usize,
    /// One-shot callbacks run.
    pub one_shots: usize,
    /// Animations advanced.
    pub animations: usize,
}

/// What one [`World::run_one_cycle`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Scheduler pass.
    pub step: StepReport,
    /// Input events processed.
    pub events: usize,
    /// Compositor flush.
    pub flush: FlushReport,
}

impl World {
    /// Run one frame at time `now` (milliseconds, monotonic).
    ///
    /// Steps morphs and animations, processes the queued input, then
    /// repaints the accumulated damage onto `surface`.
    pub fn run_one_cycle(
        &mut self,
        now: f64,
        surface: &mut dyn Surface,
    ) -> Result<CycleReport, WorldError> {
        let step = self.step_frame(now);
        let events = self.process_queued_input();
        let flush = self.flush(surface)?;
        let report = CycleReport {
            step,
            events,
            flush,
        };
        log::trace!("cycle at {now}: {report:?}");
        Ok(report)
    }

    /// Step every live morph and advance every animation.
    ///
    /// Morphs are visited depth first over a snapshot of the world and the
    /// hand; morphs destroyed or detached earlier in the pass are skipped.
    /// Each morph
    /// first runs its pending `on_next_step` callbacks, then steps unless
    /// its frame-rate limit says it is too early.
    pub fn step_frame(&mut self, now: f64) -> StepReport {
        self.now = now;
        let mut report = StepReport::default();
        let mut order = self.tree.descendants(self.root);
        order.extend(self.tree.descendants(self.hand.node));
        for id in order {
            if !self.is_live(id) {
                continue;
            }
            let Some(state) = self.tree.get_mut(id) else {
                continue;
            };
            let pending = mem::take(&mut state.on_next_step);
            for f in pending {
                f(self);
                report.one_shots += 1;
            }
            if self.is_live(id) && self.step_morph(id, now) {
                report.stepped += 1;
            }
        }
        report.animations = self.step_animations(now);
        report
    }

    fn step_morph(&mut self, id: MorphId, now: f64) -> bool {
        let Some(state) = self.tree.get_mut(id) else {
            return false;
        };
        let last = state.last_step;
        let Some(fps) = state
            .behavior
            .as_deref_mut()
            .and_then(|b| b.stepper())
            .map(|s| s.fps())
        else {
            return false;
        };
        if fps > 0.0 && last.is_some_and(|l| now - l < 1000.0 / fps) {
            return false;
        }
        state.last_step = Some(now);
        self.with_behavior(id, |b, cx| {
            if let Some(s) = b.stepper() {
                s.step(cx);
            }
        })
        .is_some()
    }

    /// Advance every active animation to `now` and drop the finished ones.
    ///
    /// Animations added while stepping start advancing next time.
    pub fn step_animations(&mut self, now: f64) -> usize {
        let mut running = mem::take(&mut self.animations);
        let mut advanced = 0;
        for (_, anim) in &mut running {
            if anim.is_active() {
                anim.step(self, now);
                advanced += 1;
            }
        }
        running.retain(|(_, a)| a.is_active());
        running.append(&mut self.animations);
        self.animations = running;
        advanced
    }

    /// Schedule an animation built by the caller.
    pub fn add_animation(&mut self, animation: Animation<Self>) -> AnimationId {
        let id = AnimationId(self.next_animation);
        self.next_animation += 1;
        self.animations.push((id, animation));
        id
    }

    /// Animate the property behind `getter`/`setter` by `delta`, starting now.
    pub fn animate(
        &mut self,
        getter: impl Fn(&Self) -> f64 + 'static,
        setter: impl FnMut(&mut Self, f64) + 'static,
        delta: f64,
        duration: f64,
        easing: Easing,
    ) -> AnimationId {
        let anim = Animation::new(self, getter, setter, delta, duration, easing, self.now);
        self.add_animation(anim)
    }

    /// Slide `id` so its origin reaches `to`, one animation per axis.
    pub fn slide_to(
        &mut self,
        id: MorphId,
        to: Point,
        duration: f64,
        easing: Easing,
    ) -> [AnimationId; 2] {
        let from = self.bounds(id).map_or(to, |b| b.origin());
        let x = self.animate(
            move |w| w.bounds(id).map_or(0.0, |b| b.x0),
            move |w, v| {
                if let Some(b) = w.bounds(id) {
                    w.set_position(id, Point::new(v, b.y0));
                }
            },
            to.x - from.x,
            duration,
            easing,
        );
        let y = self.animate(
            move |w| w.bounds(id).map_or(0.0, |b| b.y0),
            move |w, v| {
                if let Some(b) = w.bounds(id) {
                    w.set_position(id, Point::new(b.x0, v));
                }
            },
            to.y - from.y,
            duration,
            easing,
        );
        [x, y]
    }

    /// Stop an animation where it is. Returns `false` if it already finished.
    pub fn cancel_animation(&mut self, id: AnimationId) -> bool {
        match self.animations.iter_mut().find(|(a, _)| *a == id) {
            Some((_, anim)) if anim.is_active() => {
                anim.cancel();
                true
            }
            _ => false,
        }
    }

    /// Whether animation `id` is still advancing.
    pub fn is_animating(&self, id: AnimationId) -> bool {
        self.animations
            .iter()
            .any(|(a, anim)| *a == id && anim.is_active())
    }

    /// Number of animations still advancing.
    pub fn active_animations(&self) -> usize {
        self.animations.iter().filter(|(_, a)| a.is_active()).count()
    }
}
