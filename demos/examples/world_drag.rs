// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and drop in a world.
//!
//! Drag a card into a tray, run one cycle per event and report what the
//! compositor repainted.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p morphic_demos --example world_drag`

use kurbo::{Point, Rect, Size};
use morphic_world::{Canvas, Color, InputEvent, MorphCx, MorphId, MouseButton, PlainMorph, World};

struct Tray;

impl morphic_world::Morph for Tray {
    fn react_to_drop_of(&mut self, cx: &mut MorphCx<'_>, dropped: MorphId) {
        log::info!("tray {:?} received {dropped:?}", cx.id());
    }
}

fn main() {
    env_logger::init();

    let mut world = World::new(Size::new(320.0, 240.0));
    let tray = world.create(Rect::new(160.0, 40.0, 300.0, 200.0), Tray);
    world.add_child(world.root(), tray).unwrap();
    world.set_accepts_drops(tray, true);
    world.set_color(tray, Color::rgb8(120, 160, 220));

    let card = world.create(Rect::new(20.0, 20.0, 80.0, 60.0), PlainMorph);
    world.add_child(world.root(), card).unwrap();
    world.set_draggable(card, true);
    world.set_color(card, Color::rgb8(240, 200, 80));

    let mut canvas = Canvas::new(320, 240).unwrap();
    let events = [
        InputEvent::PointerMoved(Point::new(30.0, 30.0)),
        InputEvent::ButtonDown(MouseButton::Left),
        InputEvent::PointerMoved(Point::new(100.0, 60.0)),
        InputEvent::PointerMoved(Point::new(200.0, 100.0)),
        InputEvent::ButtonUp(MouseButton::Left),
    ];
    for (frame, event) in events.into_iter().enumerate() {
        world.queue_input(event);
        let report = world.run_one_cycle(frame as f64 * 16.0, &mut canvas).unwrap();
        println!("frame {frame}: {event:?} -> {:?}", report.flush);
    }

    assert_eq!(world.parent(card), Some(tray));
    println!("card now at {:?}", world.bounds(card).unwrap());
    println!(
        "pixel under card: {:?}",
        canvas.image().pixel_at(200.0, 100.0)
    );
}
