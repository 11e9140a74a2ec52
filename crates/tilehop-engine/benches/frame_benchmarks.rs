//! Per-frame step cost.
//!
//! Run with: `cargo bench --bench frame_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tilehop_engine::prelude::*;

const DT: f64 = 1.0 / 60.0;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A level of `columns` 60-unit ground tiles with a coin, an enemy and a
/// brick every few columns.
fn build_level(columns: u32) -> LevelData {
    let width = f64::from(columns) * 60.0;
    let mut data = LevelData::new(width, 600.0);
    for c in 0..columns {
        let x = f64::from(c) * 60.0;
        data.tiles
            .push(Solid::new(Rect::new(x, 540.0, 60.0, 60.0), Material::Ground));
        if c % 4 == 2 {
            data.coins.push(CoinRecord::at(x + 30.0, 450.0));
        }
        if c % 8 == 5 {
            data.enemies.push(EnemyRecord::at(x, 540.0));
        }
        if c % 16 == 11 {
            data.obstacles
                .push(Solid::new(Rect::new(x, 300.0, 60.0, 60.0), Material::Brick));
        }
    }
    data
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    for columns in [72u32, 288, 1152] {
        let data = build_level(columns);
        group.bench_with_input(BenchmarkId::from_parameter(columns), &data, |b, data| {
            let mut sim = Simulation::new(FrameConfig::default(), data).unwrap();
            sim.start();
            let mut frame = 0u64;
            b.iter(|| {
                frame += 1;
                let axis = if frame % 240 < 200 { 1 } else { -1 };
                let input = InputFrame::new(axis, frame % 50 == 0);
                black_box(sim.advance(DT, input));
            });
        });
    }
    group.finish();
}

fn bench_state_hash(c: &mut Criterion) {
    let data = build_level(288);
    let sim = Simulation::new(FrameConfig::default(), &data).unwrap();
    c.bench_function("state_hash/288", |b| b.iter(|| black_box(sim.state_hash())));
}

criterion_group!(benches, bench_advance, bench_state_hash);
criterion_main!(benches);
