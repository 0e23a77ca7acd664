//! Run report and table census
//!
//! Snapshots only. Formatting beyond JSON and plain log lines is left to
//! whoever consumes the report.

use log::info;
use serde::Serialize;

use rf_slot_rtp::{GameTables, MAX_RUN, RunStatistics, SimulationOptions, Symbol, VariantCensus};

use crate::error::SimResult;

/// Ratios derived from a statistics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRatios {
    pub rtp: f64,
    pub base_rtp: f64,
    pub free_rtp: f64,
    pub base_hit_frequency: f64,
    pub free_trigger_frequency: f64,
    pub free_hit_frequency: f64,
}

impl DerivedRatios {
    pub fn from_stats(stats: &RunStatistics) -> Self {
        Self {
            rtp: stats.rtp(),
            base_rtp: stats.base_rtp(),
            free_rtp: stats.free_rtp(),
            base_hit_frequency: stats.base_hit_frequency(),
            free_trigger_frequency: stats.free_trigger_frequency(),
            free_hit_frequency: stats.free_hit_frequency(),
        }
    }
}

/// One non-empty cell of the base game symbol breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolRow {
    pub symbol: u8,
    pub name: &'static str,
    pub run: usize,
    pub won: u64,
    pub hits: u64,
    pub rtp: f64,
    pub hit_frequency: f64,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub game: String,
    pub options: SimulationOptions,
    pub threads: usize,
    pub elapsed_secs: f64,
    pub statistics: RunStatistics,
    pub ratios: DerivedRatios,
    pub symbols: Vec<SymbolRow>,
}

impl RunReport {
    pub fn new(
        game: impl Into<String>,
        options: SimulationOptions,
        threads: usize,
        elapsed_secs: f64,
        statistics: RunStatistics,
    ) -> Self {
        let mut symbols = Vec::new();
        for run in 0..=MAX_RUN {
            for symbol in Symbol::ALL {
                let hits = statistics.symbols.hits(run, symbol);
                if hits == 0 {
                    continue;
                }
                symbols.push(SymbolRow {
                    symbol: symbol.id(),
                    name: symbol.name(),
                    run,
                    won: statistics.symbols.wins(run, symbol),
                    hits,
                    rtp: statistics.symbol_rtp(run, symbol),
                    hit_frequency: statistics.symbol_hit_frequency(run, symbol),
                });
            }
        }

        Self {
            game: game.into(),
            ratios: DerivedRatios::from_stats(&statistics),
            options,
            threads,
            elapsed_secs,
            statistics,
            symbols,
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Emit the report as `info!` lines
    pub fn log(&self) {
        let stats = &self.statistics;
        let ratios = &self.ratios;
        info!("Game: {}", self.game);
        info!(
            "Base rounds: {} ({} threads, {:.2}s)",
            stats.base.rounds, self.threads, self.elapsed_secs
        );
        info!("Total staked: {}", stats.total_staked);
        info!("Total won: {}", stats.total_won);
        info!("Total RTP: {:.6} ({:.4}%)", ratios.rtp, ratios.rtp * 100.0);
        info!("Base RTP: {:.6} ({:.4}%)", ratios.base_rtp, ratios.base_rtp * 100.0);
        info!("Free RTP: {:.6} ({:.4}%)", ratios.free_rtp, ratios.free_rtp * 100.0);
        info!(
            "Base hit frequency: {:.6} ({:.4}%)",
            ratios.base_hit_frequency,
            ratios.base_hit_frequency * 100.0
        );
        info!(
            "Free game trigger frequency: {:.6} ({:.4}%)",
            ratios.free_trigger_frequency,
            ratios.free_trigger_frequency * 100.0
        );
        info!(
            "Free games: {} (hit frequency {:.6})",
            stats.free.rounds, ratios.free_hit_frequency
        );
        info!("Max base win: {}", stats.base.max_win);
        info!("Max free win: {}", stats.free.max_win);
        for row in &self.symbols {
            info!(
                "{} x{}: won {} hits {} rtp {:.6} freq {:.8}",
                row.name, row.run, row.won, row.hits, row.rtp, row.hit_frequency
            );
        }
    }
}

/// Reel census of every reel set in a table file
#[derive(Debug, Clone, Serialize)]
pub struct CensusReport {
    pub game: String,
    pub paylines: usize,
    pub reel_sets: Vec<VariantCensus>,
}

impl CensusReport {
    pub fn new(tables: &GameTables) -> Self {
        Self {
            game: tables.name.clone(),
            paylines: tables.paylines.len(),
            reel_sets: tables.census(),
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn log(&self) {
        info!("Game: {} ({} paylines)", self.game, self.paylines);
        for entry in &self.reel_sets {
            let census = &entry.census;
            info!(
                "{}: strips {:?}, {} combinations",
                entry.name, census.strip_lengths, census.combinations
            );
            for symbol in Symbol::ALL {
                let total = census.total(symbol);
                if total == 0 {
                    continue;
                }
                let per_reel: Vec<u32> = census.counts.iter().map(|c| c[symbol.index()]).collect();
                info!("  {:<8} {:?} total {}", symbol.name(), per_reel, total);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_only_hit_cells() {
        let mut stats = RunStatistics::new();
        stats.total_staked = 1_000;
        stats.base.rounds = 20;
        stats.symbols.record(3, Symbol::Sym07, 5);
        stats.symbols.record(3, Symbol::Sym07, 5);

        let report = RunReport::new("test", SimulationOptions::default(), 1, 0.0, stats);
        assert_eq!(report.symbols.len(), 1);
        let row = &report.symbols[0];
        assert_eq!((row.symbol, row.run, row.won, row.hits), (7, 3, 10, 2));
        assert!((row.rtp - 0.01).abs() < 1e-12);
        assert!((row.hit_frequency - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_report_json_has_ratios() {
        let report = RunReport::new(
            "test",
            SimulationOptions::default(),
            2,
            1.5,
            RunStatistics::new(),
        );
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["ratios"]["rtp"], 0.0);
        assert_eq!(json["threads"], 2);
        assert!(json["statistics"]["symbols"].is_object());
    }

    #[test]
    fn test_census_report_counts_reel_sets() {
        let tables = GameTables::default_tables().unwrap();
        let report = CensusReport::new(&tables);
        assert_eq!(report.paylines, 50);
        assert_eq!(report.reel_sets.len(), 8);
        assert!(report.to_json().unwrap().contains("free-2"));
    }
}
