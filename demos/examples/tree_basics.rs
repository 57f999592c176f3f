// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Morph tree basics.
//!
//! Build a small tree, move a node, record damage, hit-test and list what
//! a damaged region has to repaint.
//!
//! Run:
//! - `cargo run -p morphic_demos --example tree_basics`

use kurbo::{Point, Rect, Vec2};
use morphic_tree::{Damage, NodeGeometry, Tree};

fn main() {
    let mut tree: Tree<&str> = Tree::new();
    let root = tree.insert(
        NodeGeometry::with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)),
        "world",
    );
    let a = tree.insert(NodeGeometry::with_bounds(Rect::new(10.0, 10.0, 60.0, 60.0)), "a");
    let b = tree.insert(
        NodeGeometry::with_bounds(Rect::new(40.0, 40.0, 120.0, 120.0)),
        "b",
    );
    tree.add_child(root, a).unwrap();
    tree.add_child(root, b).unwrap();

    // Damage the old and the new place of A around a move.
    let mut damage = Damage::new();
    damage.add(tree.full_bounds(a).unwrap());
    tree.move_by(a, Vec2::new(20.5, 0.0)).unwrap();
    damage.add(tree.full_bounds(a).unwrap());
    println!("damage rects: {:?}", damage.rects());

    // Later children are on top.
    let hit = tree.hit_test(root, Point::new(50.0, 50.0), |_, _, _| false).unwrap();
    println!("hit {:?} via {:?}", tree.get(hit.node), hit.path);
    assert_eq!(hit.node, b, "hit-test should prefer the topmost node B");

    tree.come_to_front(a);
    let hit = tree.hit_test(root, Point::new(50.0, 50.0), |_, _, _| false).unwrap();
    assert_eq!(hit.node, a, "A is on top after come_to_front");

    for rect in damage.take() {
        let names: Vec<_> = tree
            .paint_list(root, rect)
            .into_iter()
            .filter_map(|item| tree.get(item.node))
            .collect();
        println!("repaint {rect:?}: {names:?}");
    }
}
