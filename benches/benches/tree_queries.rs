// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use morphic_tree::{NodeGeometry, NodeId, Tree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A root holding `n`×`n` panels, each holding four quarter-size children.
fn gen_panel_grid(n: usize, cell: f64) -> (Tree<u32>, NodeId) {
    let mut tree = Tree::new();
    let side = n as f64 * cell;
    let root = tree.insert(NodeGeometry::with_bounds(Rect::new(0.0, 0.0, side, side)), 0);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            let panel = tree.insert(
                NodeGeometry::with_bounds(Rect::new(x0, y0, x0 + cell, y0 + cell)),
                1,
            );
            tree.add_child(root, panel).unwrap();
            let half = cell / 2.0;
            for (dx, dy) in [(0.0, 0.0), (half, 0.0), (0.0, half), (half, half)] {
                let leaf = tree.insert(
                    NodeGeometry::with_bounds(Rect::new(
                        x0 + dx,
                        y0 + dy,
                        x0 + dx + half,
                        y0 + dy + half,
                    )),
                    2,
                );
                tree.add_child(panel, leaf).unwrap();
            }
        }
    }
    (tree, root)
}

/// A root holding `count` overlapping morphs at random positions.
fn gen_random_stack(count: usize, world: f64, max_side: f64, seed: u64) -> (Tree<u32>, NodeId) {
    let mut rng = Rng::new(seed);
    let mut tree = Tree::new();
    let root = tree.insert(NodeGeometry::with_bounds(Rect::new(0.0, 0.0, world, world)), 0);
    for i in 0..count {
        let x0 = rng.next_f64() * world;
        let y0 = rng.next_f64() * world;
        let w = 1.0 + rng.next_f64() * max_side;
        let h = 1.0 + rng.next_f64() * max_side;
        let id = tree.insert(
            NodeGeometry::with_bounds(Rect::new(x0, y0, x0 + w, y0 + h)),
            i as u32,
        );
        tree.add_child(root, id).unwrap();
    }
    (tree, root)
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    for &n in &[16_usize, 64] {
        let (tree, root) = gen_panel_grid(n, 32.0);
        let side = n as f64 * 32.0;
        let mut rng = Rng::new(0x5eed);
        let points: Vec<Point> = (0..256)
            .map(|_| Point::new(rng.next_f64() * side, rng.next_f64() * side))
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("grid_{n}x{n}_opaque"), |b| {
            b.iter(|| {
                for p in &points {
                    black_box(tree.hit_test(root, *p, |_, _, _| false));
                }
            });
        });
        // Every leaf is see-through, so each hit falls back to its panel.
        group.bench_function(format!("grid_{n}x{n}_click_through"), |b| {
            b.iter(|| {
                for p in &points {
                    black_box(tree.hit_test(root, *p, |_, tag, _| *tag == 2));
                }
            });
        });
    }

    let (tree, root) = gen_random_stack(5_000, 2_000.0, 80.0, 0xfeed);
    let mut rng = Rng::new(7);
    let points: Vec<Point> = (0..256)
        .map(|_| Point::new(rng.next_f64() * 2_000.0, rng.next_f64() * 2_000.0))
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("random_stack_5000", |b| {
        b.iter(|| {
            for p in &points {
                black_box(tree.hit_test(root, *p, |_, _, _| false));
            }
        });
    });
    group.finish();
}

fn bench_paint_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint_list");
    let (tree, root) = gen_panel_grid(64, 32.0);
    for &side in &[64.0_f64, 256.0, 1024.0] {
        let rect = Rect::new(100.0, 100.0, 100.0 + side, 100.0 + side);
        group.bench_function(format!("grid_64x64_damage_{side}"), |b| {
            b.iter(|| black_box(tree.paint_list(root, black_box(rect))));
        });
    }
    group.finish();
}

fn bench_restructure(c: &mut Criterion) {
    let mut group = c.benchmark_group("restructure");
    group.bench_function("come_to_front_all", |b| {
        b.iter_batched(
            || gen_random_stack(1_000, 1_000.0, 40.0, 42),
            |(mut tree, root)| {
                let ids: Vec<NodeId> = tree.children(root).to_vec();
                for id in ids {
                    tree.come_to_front(id);
                }
                black_box(tree);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_hit_test, bench_paint_list, bench_restructure);
criterion_main!(benches);
