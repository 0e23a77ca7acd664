//! Run statistics
//!
//! Plain counters only. Every field is either a sum or a max, so partial
//! results from independent workers merge in any order.

use serde::{Deserialize, Serialize};

use crate::paytable::MAX_RUN;
use crate::symbols::{SYMBOL_COUNT, Symbol};

/// `table[run length][symbol id]`
pub type SymbolTable = [[u64; SYMBOL_COUNT]; MAX_RUN + 1];

#[inline]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Counters for one game mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStats {
    /// Rounds played (free: bonus rounds queued)
    pub rounds: u64,
    pub won: u64,
    /// Largest single-round win
    pub max_win: u64,
    /// Rounds with a non-zero win
    pub hits: u64,
}

impl ModeStats {
    /// Record the outcome of one played round
    pub fn record(&mut self, win: u64) {
        self.won += win;
        self.max_win = self.max_win.max(win);
        if win > 0 {
            self.hits += 1;
        }
    }

    pub fn merge(&mut self, other: &ModeStats) {
        self.rounds += other.rounds;
        self.won += other.won;
        self.max_win = self.max_win.max(other.max_win);
        self.hits += other.hits;
    }

    /// Share of rounds that paid anything
    pub fn hit_frequency(&self) -> f64 {
        ratio(self.hits, self.rounds)
    }
}

/// Base game line wins broken down by run length and symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolBreakdown {
    wins: SymbolTable,
    hits: SymbolTable,
}

impl Default for SymbolBreakdown {
    fn default() -> Self {
        Self {
            wins: [[0; SYMBOL_COUNT]; MAX_RUN + 1],
            hits: [[0; SYMBOL_COUNT]; MAX_RUN + 1],
        }
    }
}

impl SymbolBreakdown {
    #[inline]
    pub fn record(&mut self, run: usize, symbol: Symbol, win: u64) {
        if let Some(row) = self.wins.get_mut(run) {
            row[symbol.index()] += win;
            self.hits[run][symbol.index()] += 1;
        }
    }

    pub fn wins(&self, run: usize, symbol: Symbol) -> u64 {
        self.wins.get(run).map_or(0, |row| row[symbol.index()])
    }

    pub fn hits(&self, run: usize, symbol: Symbol) -> u64 {
        self.hits.get(run).map_or(0, |row| row[symbol.index()])
    }

    pub fn win_table(&self) -> &SymbolTable {
        &self.wins
    }

    pub fn hit_table(&self) -> &SymbolTable {
        &self.hits
    }

    pub fn total_wins(&self) -> u64 {
        self.wins.iter().flatten().sum()
    }

    pub fn total_hits(&self) -> u64 {
        self.hits.iter().flatten().sum()
    }

    pub fn merge(&mut self, other: &SymbolBreakdown) {
        for (mine, theirs) in self.wins.iter_mut().zip(other.wins.iter()) {
            for (a, b) in mine.iter_mut().zip(theirs.iter()) {
                *a += b;
            }
        }
        for (mine, theirs) in self.hits.iter_mut().zip(other.hits.iter()) {
            for (a, b) in mine.iter_mut().zip(theirs.iter()) {
                *a += b;
            }
        }
    }
}

/// Aggregate counters of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_staked: u64,
    pub total_won: u64,
    pub base: ModeStats,
    pub free: ModeStats,
    /// Base rounds that started a free spin batch
    pub free_game_starts: u64,
    pub symbols: SymbolBreakdown,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in a partial result
    pub fn merge(&mut self, other: &RunStatistics) {
        self.total_staked += other.total_staked;
        self.total_won += other.total_won;
        self.base.merge(&other.base);
        self.free.merge(&other.free);
        self.free_game_starts += other.free_game_starts;
        self.symbols.merge(&other.symbols);
    }

    /// Total won over total staked
    pub fn rtp(&self) -> f64 {
        ratio(self.total_won, self.total_staked)
    }

    pub fn base_rtp(&self) -> f64 {
        ratio(self.base.won, self.total_staked)
    }

    pub fn free_rtp(&self) -> f64 {
        ratio(self.free.won, self.total_staked)
    }

    pub fn base_hit_frequency(&self) -> f64 {
        self.base.hit_frequency()
    }

    /// Share of base rounds that led into free spins
    pub fn free_trigger_frequency(&self) -> f64 {
        ratio(self.free_game_starts, self.base.rounds)
    }

    pub fn free_hit_frequency(&self) -> f64 {
        self.free.hit_frequency()
    }

    /// Contribution of one (run length, symbol) cell to the RTP
    pub fn symbol_rtp(&self, run: usize, symbol: Symbol) -> f64 {
        ratio(self.symbols.wins(run, symbol), self.total_staked)
    }

    /// Hits of one (run length, symbol) cell per base round
    pub fn symbol_hit_frequency(&self, run: usize, symbol: Symbol) -> f64 {
        ratio(self.symbols.hits(run, symbol), self.base.rounds)
    }
}
