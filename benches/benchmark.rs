use bevy::math::Vec3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use blockplacer::block::loader as block_loader;
use blockplacer::block::{raycast_block, BlockRegistry};
use blockplacer::placement::side::{CycleDirection, MouseBucket, PitchZone, PlayerFacing, RotationKey, Side};
use blockplacer::placement::tables;
use blockplacer::placement::{PlacementContext, PlacementResolver, RayTracer};
use blockplacer::player::PlayerState;
use blockplacer::settings::PlacementSettings;
use blockplacer::world::{Viewpoint, World, WorldHost, WorldView};

fn registry() -> BlockRegistry {
    block_loader::load_blocks_from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data/blocks"))
}

/// A flat 33x33 stone floor at y = 0.
fn floor() -> World {
    let mut world = World::new();
    for x in -16..=16 {
        for z in -16..=16 {
            world.set_block(x, 0, z, 1);
        }
    }
    world
}

fn player() -> PlayerState {
    PlayerState { facing: PlayerFacing::North, pitch: PitchZone::Down, sneaking: false, held: None }
}

/// Every table lookup the resolver does, over all inputs.
fn bench_table_lookups(c: &mut Criterion) {
    c.bench_function("table_lookups", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for facing in PlayerFacing::ALL {
                for side in Side::ALL {
                    let rel = tables::side_to_relative(black_box(facing), black_box(side));
                    acc += tables::relative_to_side(facing, rel).index();
                    acc += tables::cycle(CycleDirection::Forward, rel).index();
                    for pitch in PitchZone::ALL {
                        for key in RotationKey::ALL {
                            let plane = tables::rotation_plane(pitch, key, facing);
                            acc += tables::plane_rotate(plane, side).map_or(0, Side::index);
                        }
                    }
                }
            }
            for x in [MouseBucket::Negative, MouseBucket::Neutral, MouseBucket::Positive] {
                for y in [MouseBucket::Negative, MouseBucket::Neutral, MouseBucket::Positive] {
                    acc += tables::mouse_direction(black_box(x), black_box(y)).map_or(0, |d| d.index());
                }
            }
            black_box(acc);
        })
    });
}

fn bench_raycast(c: &mut Criterion) {
    let world = floor();
    c.bench_function("raycast_floor", |b| {
        b.iter(|| {
            black_box(raycast_block(
                &world,
                black_box(Vec3::new(0.5, 2.62, 3.5)),
                black_box(Vec3::new(0.0, -1.0, -1.0)),
                5.0,
            ))
        })
    });
}

/// Steady-state frame: the view has not moved, the target is known.
fn bench_establish_per_frame(c: &mut Criterion) {
    let registry = registry();
    let world = floor();
    let viewpoint = Viewpoint { eye: Vec3::new(0.5, 2.62, 3.5), direction: Vec3::new(0.0, -1.0, -1.0), ..Default::default() };
    let view = WorldView::new(&world, &registry, viewpoint);
    let player = player();
    let settings = PlacementSettings::default();
    let ctx = PlacementContext::new(&view, &player, &settings);
    let Some(hit) = view.current_look_target() else {
        return;
    };

    let mut resolver = PlacementResolver::new();
    resolver.set_enabled(true);
    c.bench_function("establish_per_frame", |b| {
        b.iter(|| black_box(resolver.establish_placement(&ctx, black_box(hit))))
    });
}

/// Cycle through every side of a lone block, as a held forward key would.
fn bench_adjust_cycle(c: &mut Criterion) {
    let registry = registry();
    let mut world = World::new();
    world.set_block(0, 10, 0, 1);
    let viewpoint = Viewpoint { eye: Vec3::new(0.5, 14.5, 0.5), direction: Vec3::NEG_Y, ..Default::default() };
    let view = WorldView::new(&world, &registry, viewpoint);
    let player = player();
    let settings = PlacementSettings { smart_start: false, ..Default::default() };
    let ctx = PlacementContext::new(&view, &player, &settings);
    let Some(hit) = view.current_look_target() else {
        return;
    };

    let mut resolver = PlacementResolver::new();
    resolver.set_enabled(true);
    resolver.establish_placement(&ctx, hit);
    c.bench_function("adjust_cycle", |b| {
        b.iter(|| {
            for _ in 0..6 {
                black_box(resolver.adjust_place(&ctx, CycleDirection::Forward, false));
            }
        })
    });
}

/// Auto-repeat a column straight up until the resolver resets at the
/// build height.
fn bench_build_column(c: &mut Criterion) {
    let registry = registry();
    let player = player();
    let settings = PlacementSettings { smart_start: false, ..Default::default() };

    c.bench_function("build_column", |b| {
        b.iter(|| {
            let mut world = World::new();
            world.set_block(0, 0, 0, 1);
            let viewpoint = Viewpoint { eye: Vec3::new(0.5, 300.0, 0.5), direction: Vec3::NEG_Y, reach: 400.0, ..Default::default() };
            let mut resolver = PlacementResolver::new();
            resolver.set_enabled(true);
            {
                let view = WorldView::new(&world, &registry, viewpoint);
                let Some(hit) = view.current_look_target() else {
                    return;
                };
                let ctx = PlacementContext::new(&view, &player, &settings);
                resolver.establish_placement(&ctx, hit);
            }
            while !resolver.needs_reinit() {
                let mut host = WorldHost::new(&mut world, &registry, viewpoint);
                if !resolver.do_right_click(&mut host, &player, &settings) {
                    break;
                }
            }
            black_box(world.len());
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_table_lookups,
        bench_raycast,
        bench_establish_per_frame,
        bench_adjust_cycle,
        bench_build_column
}
criterion_main!(benches);
