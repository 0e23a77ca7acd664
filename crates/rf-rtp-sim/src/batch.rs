//! Parallel batch runner
//!
//! Splits a run across rayon workers. Every worker owns a [`RoundEngine`] on
//! its own ChaCha stream; all of them read the same tables, shuffled once
//! before any round is played. Worker 0 keeps the stream that did the
//! shuffle, so a single-threaded run is the plain reference run.

use std::sync::Arc;
use std::time::Instant;

use log::info;
use parking_lot::Mutex;
use rayon::prelude::*;

use rf_slot_rtp::{
    GameTables, PreparedTables, RoundEngine, RunStatistics, SeededSource, SimulationOptions,
};

use crate::error::SimResult;
use crate::report::RunReport;

/// Upper bound on rounds between two merges into the tracker
const MAX_CHUNK: u64 = 65_536;

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRESS
// ═══════════════════════════════════════════════════════════════════════════════

struct ProgressState {
    total: RunStatistics,
    next_report: u64,
    reports: u64,
}

/// Combined statistics of all workers, merged chunk by chunk
pub struct ProgressTracker {
    interval: u64,
    state: Mutex<ProgressState>,
}

impl ProgressTracker {
    /// `interval == 0` merges silently
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            state: Mutex::new(ProgressState {
                total: RunStatistics::new(),
                next_report: interval,
                reports: 0,
            }),
        }
    }

    /// Merge a finished chunk, logging when a multiple of the interval is crossed
    pub fn record(&self, chunk: &RunStatistics) {
        let mut state = self.state.lock();
        state.total.merge(chunk);

        let rounds = state.total.base.rounds;
        if self.interval == 0 || rounds < state.next_report {
            return;
        }
        while state.next_report <= rounds {
            state.next_report += self.interval;
        }
        state.reports += 1;

        let total = &state.total;
        info!(
            "Progress: {} rounds, RTP {:.6} (base {:.6}, free {:.6})",
            rounds,
            total.rtp(),
            total.base_rtp(),
            total.free_rtp()
        );
    }

    pub fn rounds(&self) -> u64 {
        self.state.lock().total.base.rounds
    }

    /// Progress lines logged so far
    pub fn reports(&self) -> u64 {
        self.state.lock().reports
    }

    pub fn into_total(self) -> RunStatistics {
        self.state.into_inner().total
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUNNER
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs a simulation across a fixed number of workers
pub struct BatchRunner {
    tables: GameTables,
    options: SimulationOptions,
    threads: usize,
}

impl BatchRunner {
    /// One worker per logical CPU
    pub fn new(tables: GameTables, options: SimulationOptions) -> Self {
        Self {
            tables,
            options,
            threads: num_cpus::get().max(1),
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Even split; the first `rounds % workers` workers take one extra
    pub fn split_rounds(rounds: u64, workers: usize) -> Vec<u64> {
        let workers = workers.max(1) as u64;
        let share = rounds / workers;
        let extra = rounds % workers;
        (0..workers)
            .map(|worker| share + u64::from(worker < extra))
            .collect()
    }

    pub fn run(self) -> SimResult<RunReport> {
        let started = Instant::now();
        let threads = self.threads;
        let mut options = self.options;
        let seed = options.seed.unwrap_or_else(rand::random);
        options.seed = Some(seed);

        let mut shuffle_source = SeededSource::with_stream(seed, 0);
        let tables = Arc::new(self.tables.prepare(&mut shuffle_source)?);
        let game = tables.name().to_string();

        let sources: Vec<SeededSource> = std::iter::once(shuffle_source)
            .chain((1..threads as u64).map(|stream| SeededSource::with_stream(seed, stream)))
            .collect();
        let shares = Self::split_rounds(options.rounds, threads);
        let tracker = ProgressTracker::new(options.progress);

        info!(
            "Simulating {} rounds of '{}' on {} threads (seed {})",
            options.rounds, game, threads, seed
        );

        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.install(|| {
            sources
                .into_par_iter()
                .zip(shares.into_par_iter())
                .try_for_each(|(source, rounds)| {
                    run_worker(Arc::clone(&tables), &options, source, rounds, &tracker)
                })
        })?;

        let statistics = tracker.into_total();
        let elapsed = started.elapsed().as_secs_f64();
        info!(
            "Finished {} base rounds in {:.2}s, RTP {:.6}",
            statistics.base.rounds,
            elapsed,
            statistics.rtp()
        );

        Ok(RunReport::new(game, options, threads, elapsed, statistics))
    }
}

fn run_worker(
    tables: Arc<PreparedTables>,
    options: &SimulationOptions,
    source: SeededSource,
    rounds: u64,
    tracker: &ProgressTracker,
) -> SimResult<()> {
    let chunk = match options.progress {
        0 => MAX_CHUNK,
        interval => interval.min(MAX_CHUNK),
    };
    let mut engine = RoundEngine::new(tables, options.clone(), source);

    let mut remaining = rounds;
    while remaining > 0 {
        let n = remaining.min(chunk);
        for _ in 0..n {
            engine.play_base_round()?;
        }
        tracker.record(&engine.take_stats());
        remaining -= n;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(rounds: u64, seed: u64) -> SimulationOptions {
        SimulationOptions {
            rounds,
            seed: Some(seed),
            progress: 1_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_split_rounds() {
        assert_eq!(BatchRunner::split_rounds(10, 3), vec![4, 3, 3]);
        assert_eq!(BatchRunner::split_rounds(2, 4), vec![1, 1, 0, 0]);
        assert_eq!(BatchRunner::split_rounds(9, 0), vec![9]);
        assert_eq!(BatchRunner::split_rounds(12, 4).iter().sum::<u64>(), 12);
    }

    #[test]
    fn test_tracker_reports_each_crossing() {
        let tracker = ProgressTracker::new(100);
        let mut chunk = RunStatistics::new();
        chunk.base.rounds = 60;

        tracker.record(&chunk);
        assert_eq!(tracker.reports(), 0);
        tracker.record(&chunk);
        assert_eq!(tracker.reports(), 1);
        tracker.record(&chunk);
        assert_eq!(tracker.reports(), 1);
        tracker.record(&chunk);
        assert_eq!(tracker.reports(), 2);
        assert_eq!(tracker.rounds(), 240);
        assert_eq!(tracker.into_total().base.rounds, 240);
    }

    #[test]
    fn test_silent_tracker_still_merges() {
        let tracker = ProgressTracker::new(0);
        let mut chunk = RunStatistics::new();
        chunk.base.rounds = 5;
        chunk.total_staked = 250;
        tracker.record(&chunk);
        tracker.record(&chunk);
        assert_eq!(tracker.reports(), 0);
        assert_eq!(tracker.into_total().total_staked, 500);
    }

    #[test]
    fn test_single_thread_matches_reference_engine() {
        let tables = GameTables::default_tables().unwrap();
        let report = BatchRunner::new(tables.clone(), options(4_000, 31))
            .with_threads(1)
            .run()
            .unwrap();

        let mut engine = RoundEngine::prepare(tables, options(4_000, 31)).unwrap();
        engine.run(4_000).unwrap();

        assert_eq!(&report.statistics, engine.stats());
    }

    #[test]
    fn test_multi_thread_run_is_reproducible() {
        let tables = GameTables::default_tables().unwrap();
        let a = BatchRunner::new(tables.clone(), options(6_000, 8))
            .with_threads(3)
            .run()
            .unwrap();
        let b = BatchRunner::new(tables, options(6_000, 8))
            .with_threads(3)
            .run()
            .unwrap();

        assert_eq!(a.statistics, b.statistics);
        assert_eq!(a.statistics.base.rounds, 6_000);
        assert_eq!(a.statistics.total_staked, 6_000 * 50);
        assert_eq!(a.threads, 3);
    }
}
