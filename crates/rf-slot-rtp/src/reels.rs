//! Reel strips, reel sets and the visible grid

use serde::{Deserialize, Serialize};

use crate::error::{RtpError, RtpResult};
use crate::rng::RandomSource;
use crate::symbols::{SYMBOL_COUNT, Symbol};

/// Number of reels (columns)
pub const REELS: usize = 5;
/// Visible rows per reel
pub const ROWS: usize = 3;

/// A circular reel strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReelStrip {
    symbols: Vec<Symbol>,
}

impl ReelStrip {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Symbol at a position, wrapping at both ends
    #[inline]
    pub fn symbol_at(&self, position: isize) -> Symbol {
        let len = self.symbols.len() as isize;
        self.symbols[position.rem_euclid(len) as usize]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The three visible cells when `stop` is the middle row
    pub fn window(&self, stop: usize) -> [Symbol; ROWS] {
        let stop = stop as isize;
        [
            self.symbol_at(stop - 1),
            self.symbol_at(stop),
            self.symbol_at(stop + 1),
        ]
    }
}

/// One strip per reel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReelSet {
    strips: Vec<ReelStrip>,
}

impl ReelSet {
    pub fn new(strips: Vec<ReelStrip>) -> Self {
        Self { strips }
    }

    pub fn strips(&self) -> &[ReelStrip] {
        &self.strips
    }

    /// Check reel count, that no strip is empty and that only expansion
    /// produces the synthetic wild
    pub fn validate(&self, variant: &str) -> RtpResult<()> {
        if self.strips.len() != REELS {
            return Err(RtpError::ReelCount {
                variant: variant.to_string(),
                expected: REELS,
                actual: self.strips.len(),
            });
        }
        for (reel, strip) in self.strips.iter().enumerate() {
            if strip.is_empty() {
                return Err(RtpError::EmptyReelStrip {
                    variant: variant.to_string(),
                    reel,
                });
            }
            if strip.symbols().contains(&Symbol::SyntheticWild) {
                return Err(RtpError::SyntheticWildOnStrip {
                    variant: variant.to_string(),
                    reel,
                });
            }
        }
        Ok(())
    }

    /// Symbol counts per reel and the number of distinct reel stops
    pub fn census(&self) -> ReelCensus {
        let mut counts = vec![[0u32; SYMBOL_COUNT]; self.strips.len()];
        let mut combinations = 1u64;
        for (reel, strip) in self.strips.iter().enumerate() {
            for symbol in strip.symbols() {
                counts[reel][symbol.index()] += 1;
            }
            if !strip.is_empty() {
                combinations = combinations.saturating_mul(strip.len() as u64);
            }
        }
        ReelCensus {
            strip_lengths: self.strips.iter().map(ReelStrip::len).collect(),
            counts,
            combinations,
        }
    }
}

/// Symbol distribution of a reel set
#[derive(Debug, Clone, Serialize)]
pub struct ReelCensus {
    pub strip_lengths: Vec<usize>,
    /// `counts[reel][symbol id]`
    pub counts: Vec<[u32; SYMBOL_COUNT]>,
    /// Product of the non-empty strip lengths
    pub combinations: u64,
}

impl ReelCensus {
    /// Occurrences of `symbol` across all reels
    pub fn total(&self, symbol: Symbol) -> u32 {
        self.counts.iter().map(|reel| reel[symbol.index()]).sum()
    }
}

/// Visible window, `cells[reel][row]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewGrid {
    cells: [[Symbol; ROWS]; REELS],
}

impl Default for ViewGrid {
    fn default() -> Self {
        Self {
            cells: [[Symbol::Blank; ROWS]; REELS],
        }
    }
}

impl ViewGrid {
    pub fn from_cells(cells: [[Symbol; ROWS]; REELS]) -> Self {
        Self { cells }
    }

    /// Build from numeric ids, `ids[reel][row]`
    pub fn from_ids(ids: [[u8; ROWS]; REELS]) -> RtpResult<Self> {
        let mut grid = Self::default();
        for (reel, column) in ids.iter().enumerate() {
            for (row, &id) in column.iter().enumerate() {
                grid.cells[reel][row] = Symbol::try_from(id)?;
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn get(&self, reel: usize, row: usize) -> Symbol {
        self.cells[reel][row]
    }

    #[inline]
    pub fn set(&mut self, reel: usize, row: usize, symbol: Symbol) {
        self.cells[reel][row] = symbol;
    }

    pub fn cells(&self) -> &[[Symbol; ROWS]; REELS] {
        &self.cells
    }

    pub fn count_where(&self, pred: impl Fn(Symbol) -> bool) -> usize {
        self.cells.iter().flatten().filter(|&&s| pred(s)).count()
    }

    pub fn wild_count(&self) -> usize {
        self.count_where(Symbol::is_wild)
    }

    pub fn scatter_count(&self) -> usize {
        self.count_where(Symbol::is_scatter)
    }

    /// Draw one stop per reel, left to right, and overwrite the window
    pub fn spin(&mut self, reels: &ReelSet, rng: &mut dyn RandomSource) -> RtpResult<()> {
        for (reel, strip) in reels.strips().iter().enumerate().take(REELS) {
            let stop = rng.next_int(strip.len() as u32)? as usize;
            self.cells[reel] = strip.window(stop);
        }
        Ok(())
    }
}

impl std::fmt::Display for ViewGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..ROWS {
            for reel in 0..REELS {
                write!(f, "{:>3}", self.cells[reel][row].id())?;
            }
            if row + 1 < ROWS {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
