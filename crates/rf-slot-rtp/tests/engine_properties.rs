//! End-to-end properties of the engine on the bundled tables

use std::sync::Arc;

use rf_slot_rtp::{
    BonusStage, FreeSpinSession, GameTables, LineEvaluator, PreparedTables, RoundEngine,
    ScriptedSource, SeededSource, SimulationOptions, Symbol, SymbolBreakdown, Trigger, ViewGrid,
    WildExpansionWeights, anchor_symbol, expand_wilds,
};

fn prepared(seed: u64) -> Arc<PreparedTables> {
    let mut rng = SeededSource::chacha(Some(seed));
    Arc::new(
        GameTables::default_tables()
            .unwrap()
            .prepare(&mut rng)
            .unwrap(),
    )
}

fn engine(seed: u64, options: SimulationOptions) -> RoundEngine {
    RoundEngine::new(prepared(seed), options, SeededSource::chacha(Some(seed)))
}

#[test]
fn totals_never_drift() {
    let mut engine = engine(5, SimulationOptions::default());
    engine.run(20_000).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.base.rounds, 20_000);
    assert_eq!(stats.total_staked, 20_000 * 50);
    assert_eq!(stats.total_won, stats.base.won + stats.free.won);
    assert!(stats.base.hits <= stats.base.rounds);
    assert!(stats.free.hits <= stats.free.rounds);
    assert!(stats.symbols.total_wins() <= stats.base.won);
    assert!(stats.rtp() > 0.0);
}

#[test]
fn free_spins_off_plays_no_bonus_rounds() {
    let options = SimulationOptions {
        free_spins: false,
        ..Default::default()
    };
    let mut engine = engine(6, options);
    engine.run(20_000).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.free.won, 0);
    assert_eq!(stats.free.hits, 0);
    if stats.free_game_starts > 0 {
        assert!(stats.free.rounds >= stats.free_game_starts);
    }
    assert_eq!(stats.total_won, stats.base.won);
}

#[test]
fn disabling_substitution_never_pays_more_lines() {
    let tables = prepared(8);
    let grid = ViewGrid::from_ids([[1, 3, 4], [3, 1, 6], [3, 7, 1], [8, 3, 9], [10, 11, 3]]).unwrap();
    let mut breakdown = SymbolBreakdown::default();

    let with = LineEvaluator::new(tables.paytable(), true, None).evaluate_grid(
        &grid,
        tables.paylines(),
        &mut breakdown,
    )
    .unwrap();
    let without = LineEvaluator::new(tables.paytable(), false, None).evaluate_grid(
        &grid,
        tables.paylines(),
        &mut breakdown,
    )
    .unwrap();
    assert!(without <= with);
    assert!(with > 0);
}

#[test]
fn every_extracted_line_anchors_on_a_grid_symbol() {
    let tables = prepared(9);
    let mut rng = SeededSource::chacha(Some(9));
    let mut grid = ViewGrid::default();
    for _ in 0..500 {
        let variant = tables.draw_base_variant(&mut rng).unwrap();
        grid.spin(&variant.reels, &mut rng).unwrap();
        for payline in tables.paylines().iter() {
            let line = payline.extract(&grid);
            let anchor = anchor_symbol(&line);
            assert!(line.contains(&anchor));
        }
    }
}

#[test]
fn expansion_leaves_crowded_grids_alone() {
    let tables = prepared(10);
    let weights: &WildExpansionWeights = &tables.stage(BonusStage::Stage3).wilds;
    let mut grid =
        ViewGrid::from_ids([[1, 3, 4], [3, 1, 6], [3, 7, 1], [8, 3, 9], [10, 11, 3]]).unwrap();
    let before = grid;
    let mut rng = ScriptedSource::new(Vec::new());

    assert_eq!(expand_wilds(&mut grid, weights, &mut rng).unwrap(), 0);
    assert_eq!(grid, before);
}

#[test]
fn retrigger_chain_walks_the_stages() {
    let tables = prepared(11);
    let mut session = FreeSpinSession::new();
    let mut grid =
        ViewGrid::from_ids([[3, 4, 5], [6, 7, 8], [9, 10, 11], [12, 3, 4], [5, 6, 7]]).unwrap();
    for reel in 0..3 {
        grid.set(reel, 0, Symbol::Scatter);
    }
    let mut rng = SeededSource::chacha(Some(11));

    let stages: Vec<Trigger> = (0..4)
        .map(|_| session.schedule(&grid, &tables, &mut rng).unwrap().trigger)
        .collect();

    assert!(matches!(stages[0], Trigger::Started { .. }));
    assert!(matches!(stages[1], Trigger::Retriggered { stage: BonusStage::Stage2, .. }));
    assert!(matches!(stages[2], Trigger::Retriggered { stage: BonusStage::Stage3, .. }));
    assert!(matches!(stages[3], Trigger::Retriggered { stage: BonusStage::Stage3, .. }));
    assert_eq!(session.front().map(|e| e.stage), Some(BonusStage::Stage1));
    assert_eq!(grid.scatter_count(), 3);
}

#[test]
fn same_seed_same_statistics() {
    let options = SimulationOptions {
        seed: Some(123),
        ..Default::default()
    };
    let mut a = RoundEngine::prepare(GameTables::default_tables().unwrap(), options.clone()).unwrap();
    let mut b = RoundEngine::prepare(GameTables::default_tables().unwrap(), options).unwrap();
    a.run(5_000).unwrap();
    b.run(5_000).unwrap();
    assert_eq!(a.stats(), b.stats());
}
