// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Morphic World: a retained-mode, single-surface GUI engine.
//!
//! ## Overview
//!
//! A [`World`] owns a tree of morphs (drawable, interactive rectangles) and
//! everything global to it:
//!
//! - a damage-tracking compositor that repaints only what changed
//!   ([`World::changed`], [`World::flush`]);
//! - the [`Hand`], which turns pointer input into hover, click, double
//!   click and drag-and-drop;
//! - the keyboard receiver and at most one active [`Menu`];
//! - a scheduler stepping morphs and [`Animation`]s once per cycle.
//!
//! Behavior is supplied through the [`Morph`] trait and its optional
//! capabilities [`PointerTarget`], [`KeyTarget`] and [`Steppable`]. Hooks get
//! a [`MorphCx`] that dereferences to the world, so they may add, move or
//! destroy any morph, themselves included.
//!
//! ## Driving a world
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use morphic_world::{Canvas, InputEvent, MouseButton, PlainMorph, World};
//!
//! let mut world = World::new(Size::new(200.0, 200.0));
//! let card = world.create(Rect::new(0.0, 0.0, 40.0, 40.0), PlainMorph);
//! world.add_child(world.root(), card).unwrap();
//! world.set_draggable(card, true);
//!
//! for event in [
//!     InputEvent::PointerMoved(Point::new(10.0, 10.0)),
//!     InputEvent::ButtonDown(MouseButton::Left),
//!     InputEvent::PointerMoved(Point::new(100.0, 100.0)),
//!     InputEvent::ButtonUp(MouseButton::Left),
//! ] {
//!     world.queue_input(event);
//! }
//! let mut canvas = Canvas::new(200, 200).unwrap();
//! world.run_one_cycle(16.0, &mut canvas).unwrap();
//! assert_eq!(world.bounds(card).unwrap().origin(), Point::new(90.0, 90.0));
//! ```
//!
//! The engine is single threaded; nothing here is `Send`.

pub mod animation;
mod color;
mod compositor;
mod cx;
mod dispatch;
mod error;
mod hand;
mod image;
pub mod menu;
mod morph;
mod scheduler;
mod settings;
mod surface;
mod world;


pub use animation::{Animation, AnimationId, Easing};
pub use color::Color;
pub use compositor::{Compositor, FlushReport};
pub use cx::{DrawCx, MorphCx};
pub use error::{LayoutError, SurfaceError, WorldError};
pub use hand::{DragSession, Hand};
pub use image::Image;
pub use menu::{Action, Menu, MenuItem, Selector};
pub use morph::{
    KeyTarget, Morph, MorphFlags, MorphId, PlainMorph, PointerTarget, Steppable,
};
pub use scheduler::{CycleReport, StepReport};
pub use settings::Settings;
pub use surface::{Canvas, Surface};
pub use world::World;

pub use morphic_input::event::{Buttons, InputEvent, Key, MouseButton};
pub use morphic_input::router::Outcome;
pub use morphic_tree::TreeError;
