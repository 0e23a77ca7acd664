//! Paytable, paylines and line evaluation

use serde::{Deserialize, Serialize};

use crate::error::{RtpError, RtpResult};
use crate::reels::{REELS, ROWS, ViewGrid};
use crate::stats::SymbolBreakdown;
use crate::symbols::{SYMBOL_COUNT, Symbol};

/// Longest possible run on a line
pub const MAX_RUN: usize = REELS;
/// Fixed number of paylines; also the stake per round
pub const PAYLINE_COUNT: usize = 50;

/// Line buffer; `None` marks a cleared cell
pub type LineBuffer = [Option<Symbol>; REELS];

/// Cleared cell sentinel
pub const CLEARED: Option<Symbol> = None;

/// Row index per reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payline {
    rows: [u8; REELS],
}

impl Payline {
    pub const fn new(rows: [u8; REELS]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[u8; REELS] {
        &self.rows
    }

    /// Cells of `grid` along this line
    pub fn extract(&self, grid: &ViewGrid) -> LineBuffer {
        let mut line = [CLEARED; REELS];
        for (reel, &row) in self.rows.iter().enumerate() {
            line[reel] = Some(grid.get(reel, row as usize));
        }
        line
    }
}

/// The full set of paylines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paylines {
    lines: Vec<Payline>,
}

impl Paylines {
    pub fn new(lines: Vec<Payline>) -> Self {
        Self { lines }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Payline> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Stake for one round, one unit per line
    pub fn total_stake(&self) -> u64 {
        self.lines.len() as u64
    }

    pub fn validate(&self) -> RtpResult<()> {
        if self.lines.len() != PAYLINE_COUNT {
            return Err(RtpError::PaylineCount {
                expected: PAYLINE_COUNT,
                actual: self.lines.len(),
            });
        }
        for (line, payline) in self.lines.iter().enumerate() {
            if let Some(&row) = payline.rows.iter().find(|&&r| r as usize >= ROWS) {
                return Err(RtpError::PaylineRowOutOfRange {
                    line,
                    row,
                    rows: ROWS,
                });
            }
        }
        Ok(())
    }
}

/// Credits per (run length, symbol)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayTable {
    pays: [[u32; SYMBOL_COUNT]; MAX_RUN + 1],
}

impl PayTable {
    pub fn new(pays: [[u32; SYMBOL_COUNT]; MAX_RUN + 1]) -> Self {
        Self { pays }
    }

    #[inline]
    pub fn pay(&self, run: usize, symbol: Symbol) -> u32 {
        self.pays
            .get(run)
            .map(|row| row[symbol.index()])
            .unwrap_or(0)
    }

    /// Run length 0 never pays; reserved ids and the scatter never pay
    pub fn validate(&self) -> RtpResult<()> {
        for (run, row) in self.pays.iter().enumerate() {
            for symbol in Symbol::ALL {
                let pay = row[symbol.index()];
                if pay > 0 && (run == 0 || !symbol.can_pay()) {
                    return Err(RtpError::NonPayingSymbolPays {
                        symbol: symbol.id(),
                        run,
                        pay,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Total-stake multiplier per scatter count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScatterMultipliers {
    multipliers: [u32; REELS + 1],
}

impl ScatterMultipliers {
    pub fn new(multipliers: [u32; REELS + 1]) -> Self {
        Self { multipliers }
    }

    pub fn multiplier(&self, scatters: usize) -> RtpResult<u32> {
        self.multipliers
            .get(scatters)
            .copied()
            .ok_or(RtpError::ScatterCountOutOfRange {
                count: scatters,
                max: self.multipliers.len() - 1,
            })
    }
}

/// Result of scoring one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWin {
    /// Symbol the run is made of
    pub anchor: Option<Symbol>,
    /// Contiguous cells from the left matching the anchor
    pub count: usize,
    /// Credits, free-spin multiplier included
    pub win: u64,
}

/// Find the anchor symbol of a line
///
/// Walks right while the current anchor is a wild. An all-wild line
/// anchors on its last wild. Both wild ids count here regardless of the
/// substitution toggle.
pub fn anchor_symbol(line: &LineBuffer) -> Option<Symbol> {
    let mut anchor = line[0];
    for &cell in line.iter() {
        if !anchor.is_some_and(Symbol::is_wild) {
            break;
        }
        anchor = cell;
    }
    anchor
}

/// Scores lines against the paytable for one spin
#[derive(Debug, Clone, Copy)]
pub struct LineEvaluator<'a> {
    paytable: &'a PayTable,
    wild_substitution: bool,
    /// Set while a free-spin batch is queued
    free_multiplier: Option<u32>,
}

impl<'a> LineEvaluator<'a> {
    pub fn new(paytable: &'a PayTable, wild_substitution: bool, free_multiplier: Option<u32>) -> Self {
        Self {
            paytable,
            wild_substitution,
            free_multiplier,
        }
    }

    /// Score one line in place
    ///
    /// Cells past the winning run are cleared. Base-game wins are recorded
    /// in `breakdown`; free-mode wins are not.
    pub fn evaluate(
        &self,
        line: &mut LineBuffer,
        breakdown: &mut SymbolBreakdown,
    ) -> RtpResult<LineWin> {
        let anchor = anchor_symbol(line);

        if self.wild_substitution {
            for cell in line.iter_mut() {
                if cell.is_some_and(Symbol::is_wild) {
                    *cell = anchor;
                }
            }
        }

        let count = line.iter().take_while(|&&cell| cell == anchor).count();
        for cell in line.iter_mut().skip(count) {
            *cell = CLEARED;
        }

        let pay = anchor.map_or(0, |symbol| u64::from(self.paytable.pay(count, symbol)));
        let win = match self.free_multiplier {
            Some(multiplier) => {
                let multiplier = u64::from(multiplier);
                pay.checked_mul(multiplier)
                    .ok_or(RtpError::WinOverflow { pay, multiplier })?
            }
            None => pay,
        };

        if let (Some(symbol), None) = (anchor, self.free_multiplier) {
            if win > 0 {
                breakdown.record(count, symbol, win);
            }
        }

        Ok(LineWin { anchor, count, win })
    }

    /// Sum of all line wins on a grid
    pub fn evaluate_grid(
        &self,
        grid: &ViewGrid,
        paylines: &Paylines,
        breakdown: &mut SymbolBreakdown,
    ) -> RtpResult<u64> {
        paylines.iter().try_fold(0u64, |total, payline| {
            let mut line = payline.extract(grid);
            let win = self.evaluate(&mut line, breakdown)?.win;
            total.checked_add(win).ok_or(RtpError::WinOverflow {
                pay: win,
                multiplier: 1,
            })
        })
    }
}
