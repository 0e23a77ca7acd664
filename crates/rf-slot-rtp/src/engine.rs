//! Round engine: plays base rounds and the bonus rounds they queue

use std::sync::Arc;

use log::{info, trace, warn};

use crate::config::{GameTables, PreparedTables, SimulationOptions};
use crate::error::{RtpError, RtpResult};
use crate::free_spins::{BonusStage, FreeSpinSession};
use crate::paytable::LineEvaluator;
use crate::reels::ViewGrid;
use crate::rng::{RandomSource, SeededSource};
use crate::stats::RunStatistics;
use crate::wilds::{WildExpansionWeights, expand_wilds};

/// Result of one base round and everything it cascaded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundOutcome {
    pub base_win: u64,
    pub free_win: u64,
    /// Queued bonus rounds drained by this round
    pub free_rounds: u64,
    /// The base spin started a free spin batch
    pub triggered: bool,
}

/// Simulation context for one thread of rounds
///
/// Owns its grid, free spin queue, statistics and random source. Tables are
/// shared read-only.
pub struct RoundEngine<R: RandomSource = SeededSource> {
    tables: Arc<PreparedTables>,
    options: SimulationOptions,
    rng: R,
    grid: ViewGrid,
    session: FreeSpinSession,
    stats: RunStatistics,
}

impl RoundEngine<SeededSource> {
    /// Reference setup: one ChaCha stream shuffles the tables and then
    /// drives every round
    pub fn prepare(tables: GameTables, options: SimulationOptions) -> RtpResult<Self> {
        let mut rng = SeededSource::chacha(options.seed);
        let prepared = tables.prepare(&mut rng)?;
        Ok(Self::new(Arc::new(prepared), options, rng))
    }
}

impl<R: RandomSource> RoundEngine<R> {
    pub fn new(tables: Arc<PreparedTables>, options: SimulationOptions, rng: R) -> Self {
        Self {
            tables,
            options,
            rng,
            grid: ViewGrid::default(),
            session: FreeSpinSession::new(),
            stats: RunStatistics::new(),
        }
    }

    pub fn tables(&self) -> &PreparedTables {
        &self.tables
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn into_stats(self) -> RunStatistics {
        self.stats
    }

    /// Hand over the counters gathered so far and start again from zero
    pub fn take_stats(&mut self) -> RunStatistics {
        std::mem::take(&mut self.stats)
    }

    /// Grid left by the most recent spin
    pub fn grid(&self) -> &ViewGrid {
        &self.grid
    }

    pub fn session(&self) -> &FreeSpinSession {
        &self.session
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ROUNDS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play one base round and drain every bonus round it queues
    pub fn play_base_round(&mut self) -> RtpResult<RoundOutcome> {
        let tables = Arc::clone(&self.tables);
        let variant = tables.draw_base_variant(&mut self.rng)?;

        self.grid.spin(&variant.reels, &mut self.rng)?;
        let schedule = self.session.schedule(&self.grid, &tables, &mut self.rng)?;
        let base_win = self.score(&tables, &variant.wilds, schedule.scatter_multiplier)?;

        self.stats.total_staked += tables.stake();
        self.stats.base.rounds += 1;
        self.stats.base.record(base_win);
        self.stats.total_won += base_win;

        let triggered = self.session.is_active();
        if triggered {
            self.stats.free_game_starts += 1;
        }

        let mut outcome = RoundOutcome {
            base_win,
            triggered,
            ..Default::default()
        };

        // The head stays queued while it plays so the round scores in free mode
        while let Some(entry) = self.session.front().copied() {
            self.stats.free.rounds += 1;
            outcome.free_rounds += 1;
            if self.options.free_spins {
                outcome.free_win += self.play_bonus_round(&tables, entry.stage)?;
            }
            self.session.pop_front();
        }

        let leftover = self.session.reset();
        if leftover > 0 {
            warn!("Cleared {leftover} free spin entries left after a base round");
        }

        trace!(
            "Base round '{}': base {} free {} over {} bonus rounds",
            variant.name, outcome.base_win, outcome.free_win, outcome.free_rounds
        );
        Ok(outcome)
    }

    fn play_bonus_round(&mut self, tables: &PreparedTables, stage: BonusStage) -> RtpResult<u64> {
        let stage_tables = tables.stage(stage);

        self.grid.spin(&stage_tables.reels, &mut self.rng)?;
        let schedule = self.session.schedule(&self.grid, tables, &mut self.rng)?;
        let win = self.score(tables, &stage_tables.wilds, schedule.scatter_multiplier)?;

        self.stats.free.record(win);
        self.stats.total_won += win;
        Ok(win)
    }

    /// Expand wilds, then sum all line wins plus the scatter award
    fn score(
        &mut self,
        tables: &PreparedTables,
        weights: &WildExpansionWeights,
        scatter_multiplier: u32,
    ) -> RtpResult<u64> {
        if self.options.wild_expansion {
            expand_wilds(&mut self.grid, weights, &mut self.rng)?;
        }

        let evaluator = LineEvaluator::new(
            tables.paytable(),
            self.options.wild_substitution,
            self.session.line_multiplier(),
        );
        let lines = evaluator.evaluate_grid(&self.grid, tables.paylines(), &mut self.stats.symbols)?;
        let scatter = u64::from(scatter_multiplier) * tables.stake();

        lines.checked_add(scatter).ok_or(RtpError::WinOverflow {
            pay: scatter,
            multiplier: 1,
        })
    }

    /// Play `rounds` base rounds
    pub fn run(&mut self, rounds: u64) -> RtpResult<&RunStatistics> {
        info!("Playing {rounds} base rounds on '{}'", self.tables.name());
        for _ in 0..rounds {
            self.play_base_round()?;
        }
        info!(
            "Played {} base rounds, {} free rounds, RTP {:.6}",
            self.stats.base.rounds,
            self.stats.free.rounds,
            self.stats.rtp()
        );
        Ok(&self.stats)
    }
}
