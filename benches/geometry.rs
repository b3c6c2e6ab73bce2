//! Benchmarks for the orientation and placement pipeline.

use std::f32::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cubeview::cube::{CubePiece, RotationMatrix, Side, StickerColor, StickerFace};
use cubeview::geometry::{rotation_vector, sticker_placement};
use cubeview::scene::compose;

/// A quarter turn about +Y as the backend sends it.
const QUARTER_TURN_Y: RotationMatrix =
    RotationMatrix([0.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0]);

/// A cube's worth of corner pieces, each turned a little further.
fn sample_pieces() -> Vec<CubePiece> {
    (0..27)
        .map(|i| {
            let angle = i as f32 * PI / 27.0;
            let (sin, cos) = angle.sin_cos();
            CubePiece {
                position: [1.0, 1.0, 1.0],
                rotation: RotationMatrix([cos, 0.0, -sin, 0.0, 1.0, 0.0, sin, 0.0, cos]),
                faces: [Side::Up, Side::Right, Side::Front]
                    .into_iter()
                    .map(|side| StickerFace {
                        initial_side_direction: side,
                        color: StickerColor::White,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Benchmark converting one orientation matrix.
fn bench_rotation_vector(c: &mut Criterion) {
    c.bench_function("rotation_vector", |b| {
        b.iter(|| rotation_vector(black_box(&QUARTER_TURN_Y)))
    });
}

/// Benchmark placing all six stickers.
fn bench_sticker_placement(c: &mut Criterion) {
    c.bench_function("sticker_placement", |b| {
        b.iter(|| Side::ALL.map(|side| sticker_placement(black_box(side))))
    });
}

/// Benchmark building the models for one animation frame.
fn bench_compose_frame(c: &mut Criterion) {
    let pieces = sample_pieces();

    c.bench_function("compose_frame", |b| b.iter(|| compose(black_box(&pieces))));
}

criterion_group!(
    benches,
    bench_rotation_vector,
    bench_sticker_placement,
    bench_compose_frame
);
criterion_main!(benches);
