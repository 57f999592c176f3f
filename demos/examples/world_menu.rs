// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pop-up menus.
//!
//! Open a menu with a submenu, walk it with the keyboard and run an item.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p morphic_demos --example world_menu`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use morphic_world::{Action, Canvas, InputEvent, Key, Menu, MenuItem, PlainMorph, Selector, World};

fn main() {
    env_logger::init();

    let mut world = World::new(Size::new(320.0, 240.0));
    let target = world.create(Rect::new(10.0, 10.0, 50.0, 50.0), PlainMorph);
    world.add_child(world.root(), target).unwrap();

    let picked = Rc::new(RefCell::new(Vec::new()));
    let log_choice = |name: &'static str| {
        let picked = picked.clone();
        Action::callback(move |_| picked.borrow_mut().push(name))
    };
    let menu = Menu::new(vec![
        MenuItem::new("hide", Action::Method {
            target,
            selector: Selector::Hide,
        }),
        MenuItem::submenu("color", vec![
            MenuItem::new("red", log_choice("red")),
            MenuItem::new("blue", log_choice("blue")),
        ]),
        MenuItem::new("nothing", log_choice("nothing")).disabled(),
    ]);
    // Popping up near the corner keeps the menu inside the world.
    let id = world.pop_up_menu(menu, Point::new(300.0, 220.0));
    println!("menu bounds: {:?}", world.bounds(id).unwrap());

    let mut canvas = Canvas::new(320, 240).unwrap();
    for key in [Key::ArrowDown, Key::ArrowDown, Key::ArrowRight, Key::ArrowDown, Key::Enter] {
        world.queue_input(InputEvent::KeyDown(key));
        world.queue_input(InputEvent::KeyUp(key));
    }
    world.run_one_cycle(0.0, &mut canvas).unwrap();

    println!("picked: {:?}", picked.borrow());
    assert_eq!(*picked.borrow(), ["blue"]);
    assert!(world.active_menu().is_none());
}
