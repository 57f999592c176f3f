// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The morph extension contract.
//!
//! A morph's geometry, flags and cached image live in the [`World`]; its
//! behavior is a `Box<dyn Morph>`. Behaviors opt into input and stepping by
//! returning themselves from [`Morph::pointer`], [`Morph::keyboard`] and
//! [`Morph::stepper`].

use core::any::Any;
use core::fmt;

use bitflags::bitflags;
use kurbo::{Point, Rect, Size, Vec2};
use morphic_input::event::{Buttons, Key};
use morphic_input::router::Outcome;
use morphic_tree::NodeId;

use crate::color::Color;
use crate::cx::{DrawCx, MorphCx};
use crate::error::{LayoutError, SurfaceError};
use crate::image::Image;
use crate::surface::Surface;
use crate::world::World;

/// Handle of a morph. Handles are generational and never alias a newer morph.
pub type MorphId = NodeId;

bitflags! {
    /// Interaction flags of a morph.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MorphFlags: u8 {
        /// The hand may pick this morph up.
        const DRAGGABLE = 1 << 0;
        /// Other morphs may be dropped onto this one.
        const ACCEPTS_DROPS = 1 << 1;
    }
}

/// Behavior of a morph.
///
/// Every hook has a default, so `struct Label; impl Morph for Label {}` is a
/// valid filled rectangle.
pub trait Morph: Any {
    /// Draw the part of the morph inside `clip` (surface space).
    ///
    /// The default composites the cached image.
    fn draw_on(
        &self,
        cx: &DrawCx<'_>,
        surface: &mut dyn Surface,
        clip: Rect,
    ) -> Result<(), SurfaceError> {
        cx.draw_cached_image(surface, clip)
    }

    /// Produce the cached image for a morph of `size` painted in `color`.
    ///
    /// Returning `None` makes the morph fully transparent. The default fills
    /// the whole extent unless `color` is transparent.
    fn render(&self, size: Size, color: Color) -> Option<Image> {
        if color.a == 0 {
            return None;
        }
        Image::for_size(size, color)
    }

    /// Compute new bounds from the current ones.
    fn layout(&mut self, current: Rect) -> Result<Rect, LayoutError> {
        Ok(current)
    }

    /// The morph the hand should pick up when `me` is pressed, or `None` to refuse.
    ///
    /// The default grabs the top-level morph `me` belongs to.
    fn root_for_grab(&self, me: MorphId, world: &World) -> Option<MorphId> {
        world.top_level_ancestor(me)
    }

    /// Whether `dropped` may land on this morph. Only asked when the morph
    /// accepts drops at all.
    fn wants_drop_of(&self, dropped: MorphId, world: &World) -> bool {
        let _ = (dropped, world);
        true
    }

    /// `dropped` has just been added to this morph by the hand.
    fn react_to_drop_of(&mut self, cx: &mut MorphCx<'_>, dropped: MorphId) {
        let _ = (cx, dropped);
    }

    /// `grabbed` has just been taken out of this morph by the hand.
    fn react_to_grab_of(&mut self, cx: &mut MorphCx<'_>, grabbed: MorphId) {
        let _ = (cx, grabbed);
    }

    /// This morph has just been dropped somewhere.
    fn just_dropped(&mut self, cx: &mut MorphCx<'_>) {
        let _ = cx;
    }

    /// Handle an application-defined selector sent by a menu action.
    fn perform(&mut self, cx: &mut MorphCx<'_>, selector: u32) {
        let _ = (cx, selector);
    }

    /// Pointer capability.
    fn pointer(&mut self) -> Option<&mut dyn PointerTarget> {
        None
    }

    /// Keyboard capability.
    fn keyboard(&mut self) -> Option<&mut dyn KeyTarget> {
        None
    }

    /// Stepping capability.
    fn stepper(&mut self) -> Option<&mut dyn Steppable> {
        None
    }
}

/// Pointer hooks. Hooks returning an [`Outcome`] bubble to the container
/// while they answer [`Outcome::Continue`].
#[allow(unused_variables, reason = "default hooks ignore their arguments")]
pub trait PointerTarget {
    /// Left button pressed over the morph.
    fn mouse_down_left(&mut self, cx: &mut MorphCx<'_>, pos: Point) -> Outcome {
        Outcome::Continue
    }
    /// Right button pressed over the morph.
    fn mouse_down_right(&mut self, cx: &mut MorphCx<'_>, pos: Point) -> Outcome {
        Outcome::Continue
    }
    /// Left button clicked.
    fn mouse_click_left(&mut self, cx: &mut MorphCx<'_>, pos: Point) -> Outcome {
        Outcome::Continue
    }
    /// Right button clicked.
    fn mouse_click_right(&mut self, cx: &mut MorphCx<'_>, pos: Point) -> Outcome {
        Outcome::Continue
    }
    /// Second left click of a double click.
    fn mouse_double_click(&mut self, cx: &mut MorphCx<'_>, pos: Point) -> Outcome {
        Outcome::Continue
    }
    /// Pointer moved over the morph (or anywhere, while it holds the capture).
    fn mouse_move(&mut self, cx: &mut MorphCx<'_>, pos: Point, buttons: Buttons) -> Outcome {
        Outcome::Continue
    }
    /// Wheel scrolled over the morph.
    fn mouse_scroll(&mut self, cx: &mut MorphCx<'_>, delta: Vec2) -> Outcome {
        Outcome::Continue
    }
    /// Pointer entered the morph.
    fn mouse_enter(&mut self, cx: &mut MorphCx<'_>) {}
    /// Pointer left the morph.
    fn mouse_leave(&mut self, cx: &mut MorphCx<'_>) {}
    /// Pointer entered the morph carrying `dragged`.
    fn mouse_enter_dragging(&mut self, cx: &mut MorphCx<'_>, dragged: MorphId) {}
    /// Pointer left the morph carrying `dragged`.
    fn mouse_leave_dragging(&mut self, cx: &mut MorphCx<'_>, dragged: MorphId) {}
}

/// Keyboard hooks, delivered only to the world's keyboard receiver.
#[allow(unused_variables, reason = "default hooks ignore their arguments")]
pub trait KeyTarget {
    /// A key went down; `repeat` is set for auto-repeat.
    fn key_down(&mut self, cx: &mut MorphCx<'_>, key: Key, repeat: bool) {}
    /// A key went up.
    fn key_up(&mut self, cx: &mut MorphCx<'_>, key: Key) {}
}

/// Per-frame behavior.
pub trait Steppable {
    /// Called once per cycle, or at most `fps` times per second.
    fn step(&mut self, cx: &mut MorphCx<'_>);

    /// Step rate limit; `0` steps every cycle.
    fn fps(&self) -> f64 {
        0.0
    }
}

/// The simplest morph: a rectangle filled with its color.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainMorph;

impl Morph for PlainMorph {}

pub(crate) type OneShot = Box<dyn FnOnce(&mut World)>;

/// Tree payload of a morph.
pub(crate) struct MorphState {
    /// `None` while a hook of this morph is running.
    pub(crate) behavior: Option<Box<dyn Morph>>,
    pub(crate) image: Option<Image>,
    pub(crate) color: Color,
    pub(crate) alpha: f64,
    pub(crate) flags: MorphFlags,
    pub(crate) last_step: Option<f64>,
    pub(crate) on_next_step: Vec<OneShot>,
}

impl MorphState {
    pub(crate) fn new(behavior: Box<dyn Morph>, color: Color) -> Self {
        Self {
            behavior: Some(behavior),
            image: None,
            color,
            alpha: 1.0,
            flags: MorphFlags::empty(),
            last_step: None,
            on_next_step: Vec::new(),
        }
    }

    /// Whether the cached image lets a click at the surface point `pt` through.
    pub(crate) fn is_transparent_at(&self, bounds: Rect, pt: Point, threshold: u8) -> bool {
        let Some(image) = &self.image else {
            return true;
        };
        image
            .pixel_at(pt.x - bounds.x0, pt.y - bounds.y0)
            .is_none_or(|c| c.a <= threshold)
    }
}

impl fmt::Debug for MorphState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MorphState")
            .field("busy", &self.behavior.is_none())
            .field("has_image", &self.image.is_some())
            .field("color", &self.color)
            .field("alpha", &self.alpha)
            .field("flags", &self.flags)
            .field("pending_one_shots", &self.on_next_step.len())
            .finish_non_exhaustive()
    }
}
