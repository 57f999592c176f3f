// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use morphic_world::{Canvas, Color, InputEvent, MouseButton, PlainMorph, World};

const SIDE: f64 = 512.0;

/// A world tiled with `n`×`n` morphs, already flushed once.
fn tiled_world(n: usize) -> (World, Canvas) {
    let mut world = World::new(Size::new(SIDE, SIDE));
    let cell = SIDE / n as f64;
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            let id = world.create(Rect::new(x0, y0, x0 + cell - 1.0, y0 + cell - 1.0), PlainMorph);
            world.add_child(world.root(), id).unwrap();
            world.set_draggable(id, true);
            let shade = ((x + y) % 2 * 80) as u8;
            world.set_color(id, Color::rgb8(shade, shade, 200));
        }
    }
    let mut canvas = Canvas::new(SIDE as u32, SIDE as u32).unwrap();
    world.flush(&mut canvas).unwrap();
    (world, canvas)
}

fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush");
    for &n in &[8_usize, 32] {
        group.bench_function(format!("full_repaint_{n}x{n}"), |b| {
            b.iter_batched(
                || {
                    let (mut world, canvas) = tiled_world(n);
                    world.invalidate(Rect::new(0.0, 0.0, SIDE, SIDE));
                    (world, canvas)
                },
                |(mut world, mut canvas)| black_box(world.flush(&mut canvas).unwrap()),
                BatchSize::LargeInput,
            );
        });
        group.bench_function(format!("small_damage_{n}x{n}"), |b| {
            b.iter_batched(
                || {
                    let (mut world, canvas) = tiled_world(n);
                    world.invalidate(Rect::new(100.0, 100.0, 140.0, 120.0));
                    (world, canvas)
                },
                |(mut world, mut canvas)| black_box(world.flush(&mut canvas).unwrap()),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag");
    let moves: Vec<InputEvent> = (0..64)
        .map(|i| InputEvent::PointerMoved(Point::new(5.0 + f64::from(i) * 4.0, 5.0 + f64::from(i) * 2.0)))
        .collect();
    group.throughput(Throughput::Elements(moves.len() as u64));
    group.bench_function("drag_across_16x16_with_cycles", |b| {
        b.iter_batched(
            || tiled_world(16),
            |(mut world, mut canvas)| {
                world.handle_input(InputEvent::PointerMoved(Point::new(5.0, 5.0)));
                world.handle_input(InputEvent::ButtonDown(MouseButton::Left));
                for (i, e) in moves.iter().enumerate() {
                    world.queue_input(*e);
                    black_box(world.run_one_cycle(i as f64 * 16.0, &mut canvas).unwrap());
                }
                world.handle_input(InputEvent::ButtonUp(MouseButton::Left));
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn bench_hover(c: &mut Criterion) {
    let mut group = c.benchmark_group("hover");
    let (mut world, _) = tiled_world(32);
    let points: Vec<Point> = (0..256)
        .map(|i| Point::new(f64::from(i) * 2.0, f64::from(i % 97) * 5.0))
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("pointer_moves_32x32", |b| {
        b.iter(|| {
            for p in &points {
                world.handle_input(InputEvent::PointerMoved(*p));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_flush, bench_drag, bench_hover);
criterion_main!(benches);
