//! Base round throughput benchmarks

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rf_slot_rtp::{
    GameTables, LineEvaluator, RoundEngine, SeededSource, SimulationOptions, SymbolBreakdown,
    ViewGrid,
};

fn prepared() -> Arc<rf_slot_rtp::PreparedTables> {
    let mut rng = SeededSource::chacha(Some(1));
    Arc::new(
        GameTables::default_tables()
            .and_then(|tables| tables.prepare(&mut rng))
            .expect("bundled tables are valid"),
    )
}

fn bench_base_round(c: &mut Criterion) {
    let tables = prepared();
    let mut engine = RoundEngine::new(
        tables,
        SimulationOptions::default(),
        SeededSource::chacha(Some(42)),
    );

    c.bench_function("base_round", |b| {
        b.iter(|| black_box(engine.play_base_round().expect("round")))
    });
}

fn bench_base_round_no_features(c: &mut Criterion) {
    let options = SimulationOptions {
        free_spins: false,
        wild_expansion: false,
        ..Default::default()
    };
    let mut engine = RoundEngine::new(prepared(), options, SeededSource::chacha(Some(42)));

    c.bench_function("base_round_no_features", |b| {
        b.iter(|| black_box(engine.play_base_round().expect("round")))
    });
}

fn bench_line_scoring(c: &mut Criterion) {
    let tables = prepared();
    let grid = ViewGrid::from_ids([[1, 3, 4], [3, 5, 6], [3, 7, 1], [8, 3, 9], [10, 11, 3]])
        .expect("valid ids");
    let evaluator = LineEvaluator::new(tables.paytable(), true, None);
    let mut breakdown = SymbolBreakdown::default();

    c.bench_function("score_50_lines", |b| {
        b.iter(|| {
            black_box(evaluator.evaluate_grid(black_box(&grid), tables.paylines(), &mut breakdown))
        })
    });
}

criterion_group!(
    benches,
    bench_base_round,
    bench_base_round_no_features,
    bench_line_scoring
);
criterion_main!(benches);
