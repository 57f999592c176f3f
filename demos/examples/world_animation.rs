// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stepping and animation.
//!
//! A blinking morph steps at a fixed rate while another one slides across
//! the world with an easing curve.
//!
//! Run:
//! - `cargo run -p morphic_demos --example world_animation`

use kurbo::{Point, Rect, Size};
use morphic_world::{Canvas, Easing, Morph, MorphCx, Steppable, World};

struct Blinker {
    on: bool,
}

impl Morph for Blinker {
    fn stepper(&mut self) -> Option<&mut dyn Steppable> {
        Some(self)
    }
}

impl Steppable for Blinker {
    fn step(&mut self, cx: &mut MorphCx<'_>) {
        self.on = !self.on;
        let me = cx.id();
        if self.on {
            cx.show(me);
        } else {
            cx.hide(me);
        }
    }

    fn fps(&self) -> f64 {
        4.0
    }
}

fn main() {
    env_logger::init();

    let mut world = World::new(Size::new(400.0, 100.0));
    let blinker = world.create(Rect::new(5.0, 5.0, 15.0, 15.0), Blinker { on: true });
    world.add_child(world.root(), blinker).unwrap();

    let slider = world.create(Rect::new(0.0, 40.0, 20.0, 60.0), morphic_world::PlainMorph);
    world.add_child(world.root(), slider).unwrap();
    world.slide_to(
        slider,
        Point::new(380.0, 40.0),
        500.0,
        Easing::from_name("quad_inout"),
    );

    let mut canvas = Canvas::new(400, 100).unwrap();
    let mut frame = 0;
    while world.active_animations() > 0 {
        let now = f64::from(frame) * 16.0;
        let report = world.run_one_cycle(now, &mut canvas).unwrap();
        if frame % 8 == 0 {
            println!(
                "t={now:>5}ms x={:>6.1} blinker visible={} {:?}",
                world.bounds(slider).unwrap().x0,
                world.is_visible(blinker),
                report.step,
            );
        }
        frame += 1;
    }
    assert_eq!(world.bounds(slider).unwrap().origin(), Point::new(380.0, 40.0));
}
