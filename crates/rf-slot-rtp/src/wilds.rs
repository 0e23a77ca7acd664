//! Wild expansion
//!
//! After a spin with one or two wilds in view, ordinary cells may be
//! promoted to wild. Each cell draws a value in `1..=100` and becomes a
//! candidate when the draw is at or below that cell's weight.

use serde::{Deserialize, Serialize};

use crate::error::{RtpError, RtpResult};
use crate::reels::{REELS, ROWS, ViewGrid};
use crate::rng::RandomSource;
use crate::symbols::Symbol;

/// Upper bound of a single weight (a percentage)
pub const MAX_WEIGHT: u8 = 100;

/// Most cells promoted when one wild is visible
const ONE_WILD_LIMIT: usize = 3;
/// Most cells promoted when two wilds are visible
const TWO_WILD_LIMIT: usize = 2;

/// Per-cell promotion thresholds, indexed `[reel][row]`
pub type WeightMatrix = [[u8; ROWS]; REELS];

/// Expansion weights of one reel set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildExpansionWeights {
    /// Used when exactly one wild is visible
    pub one_wild: WeightMatrix,
    /// Used when exactly two wilds are visible
    pub two_wilds: WeightMatrix,
}

impl WildExpansionWeights {
    /// Matrix for a given visible wild count
    pub fn for_wild_count(&self, wilds: usize) -> Option<&WeightMatrix> {
        match wilds {
            1 => Some(&self.one_wild),
            2 => Some(&self.two_wilds),
            _ => None,
        }
    }

    pub fn validate(&self, variant: &str) -> RtpResult<()> {
        for matrix in [&self.one_wild, &self.two_wilds] {
            for (reel, rows) in matrix.iter().enumerate() {
                for (row, &weight) in rows.iter().enumerate() {
                    if weight > MAX_WEIGHT {
                        return Err(RtpError::WildWeightOutOfRange {
                            variant: variant.to_string(),
                            reel,
                            row,
                            weight,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Cells that may not be promoted
#[inline]
fn is_blocked(symbol: Symbol) -> bool {
    symbol.is_wild() || symbol.is_scatter()
}

/// Promote cells to wild in place
///
/// Returns the number of promoted cells. Grids with zero or three or more
/// wilds are left alone and draw nothing.
pub fn expand_wilds(
    grid: &mut ViewGrid,
    weights: &WildExpansionWeights,
    rng: &mut dyn RandomSource,
) -> RtpResult<usize> {
    let wilds = grid.wild_count();
    let Some(matrix) = weights.for_wild_count(wilds) else {
        return Ok(0);
    };

    // Reel-major draw order, one draw per cell whether or not it is free
    let mut candidates = [[false; ROWS]; REELS];
    for reel in 0..REELS {
        for row in 0..ROWS {
            let draw = 1 + rng.next_int(MAX_WEIGHT as u32)?;
            candidates[reel][row] =
                draw <= matrix[reel][row] as u32 && !is_blocked(grid.get(reel, row));
        }
    }

    let free = |reel: usize, row: usize| !is_blocked(grid.get(reel, row));
    let count = |candidates: &[[bool; ROWS]; REELS]| {
        candidates.iter().flatten().filter(|&&c| c).count()
    };

    let limit = if wilds == 1 {
        if count(&candidates) == 0 && free(4, 1) {
            candidates[4][1] = true;
        }
        ONE_WILD_LIMIT
    } else {
        if count(&candidates) == 0 {
            for row in [0, 2] {
                if free(4, row) {
                    candidates[4][row] = true;
                }
            }
        }
        if count(&candidates) == 1 && free(4, 1) {
            candidates[4][1] = true;
        }
        TWO_WILD_LIMIT
    };

    // Row-outer, reel-inner scan decides which candidates win the limit
    let mut promoted = 0;
    'scan: for row in 0..ROWS {
        for reel in 0..REELS {
            if promoted == limit {
                break 'scan;
            }
            if candidates[reel][row] {
                grid.set(reel, row, Symbol::Wild);
                promoted += 1;
            }
        }
    }

    Ok(promoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    const ZERO: WeightMatrix = [[0; ROWS]; REELS];
    const FULL: WeightMatrix = [[MAX_WEIGHT; ROWS]; REELS];

    fn weights(one_wild: WeightMatrix, two_wilds: WeightMatrix) -> WildExpansionWeights {
        WildExpansionWeights { one_wild, two_wilds }
    }

    /// Plain pay symbols everywhere
    fn plain_grid() -> ViewGrid {
        ViewGrid::from_ids([[3, 4, 5], [6, 7, 8], [9, 10, 11], [12, 3, 4], [5, 6, 7]]).unwrap()
    }

    /// Scripted draws that yield `1 + 0 = 1` for every cell
    fn low_draws() -> ScriptedSource {
        ScriptedSource::new(vec![0; REELS * ROWS])
    }

    /// Scripted draws that yield `1 + 99 = 100` for every cell
    fn high_draws() -> ScriptedSource {
        ScriptedSource::new(vec![99; REELS * ROWS])
    }

    #[test]
    fn test_no_wilds_is_noop() {
        let mut grid = plain_grid();
        let before = grid;
        let mut rng = ScriptedSource::new(Vec::new());

        let promoted = expand_wilds(&mut grid, &weights(FULL, FULL), &mut rng).unwrap();
        assert_eq!(promoted, 0);
        assert_eq!(grid, before);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_three_wilds_is_noop() {
        let mut grid = plain_grid();
        grid.set(0, 0, Symbol::Wild);
        grid.set(1, 1, Symbol::Wild);
        grid.set(2, 2, Symbol::SyntheticWild);
        let before = grid;
        let mut rng = ScriptedSource::new(Vec::new());

        assert_eq!(expand_wilds(&mut grid, &weights(FULL, FULL), &mut rng).unwrap(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_one_wild_zero_weights_forces_center_right() {
        let mut grid = plain_grid();
        grid.set(1, 0, Symbol::Wild);
        let mut rng = low_draws();

        let promoted = expand_wilds(&mut grid, &weights(ZERO, ZERO), &mut rng).unwrap();
        assert_eq!(promoted, 1);
        assert_eq!(grid.get(4, 1), Symbol::Wild);
        assert_eq!(grid.wild_count(), 2);
        assert_eq!(rng.draws(), REELS * ROWS);
    }

    #[test]
    fn test_one_wild_forced_cell_blocked_by_scatter() {
        let mut grid = plain_grid();
        grid.set(1, 0, Symbol::Wild);
        grid.set(4, 1, Symbol::Scatter);
        let before = grid;
        let mut rng = low_draws();

        assert_eq!(expand_wilds(&mut grid, &weights(ZERO, ZERO), &mut rng).unwrap(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_one_wild_caps_at_three_in_row_major_scan() {
        let mut grid = plain_grid();
        grid.set(0, 0, Symbol::Wild);
        let mut rng = low_draws();

        let promoted = expand_wilds(&mut grid, &weights(FULL, ZERO), &mut rng).unwrap();
        assert_eq!(promoted, 3);
        // Row 0 is scanned first; reel 0 already holds the wild
        assert_eq!(grid.get(1, 0), Symbol::Wild);
        assert_eq!(grid.get(2, 0), Symbol::Wild);
        assert_eq!(grid.get(3, 0), Symbol::Wild);
        assert_eq!(grid.get(4, 0), Symbol::Sym05);
        assert_eq!(grid.get(0, 1), Symbol::Sym04);
    }

    #[test]
    fn test_draw_above_weight_is_not_candidate() {
        let mut grid = plain_grid();
        grid.set(0, 0, Symbol::Wild);
        let mut one_wild = ZERO;
        one_wild[2][2] = 99;
        let mut rng = high_draws();

        // 100 > 99 so nothing qualifies and the fallback cell is used
        let promoted = expand_wilds(&mut grid, &weights(one_wild, ZERO), &mut rng).unwrap();
        assert_eq!(promoted, 1);
        assert_eq!(grid.get(2, 2), Symbol::Sym11);
        assert_eq!(grid.get(4, 1), Symbol::Wild);
    }

    #[test]
    fn test_two_wilds_zero_weights_forces_outer_right_cells() {
        let mut grid = plain_grid();
        grid.set(0, 0, Symbol::Wild);
        grid.set(1, 1, Symbol::Wild);
        let mut rng = low_draws();

        let promoted = expand_wilds(&mut grid, &weights(ZERO, ZERO), &mut rng).unwrap();
        assert_eq!(promoted, 2);
        assert_eq!(grid.get(4, 0), Symbol::Wild);
        assert_eq!(grid.get(4, 2), Symbol::Wild);
        assert_eq!(grid.get(4, 1), Symbol::Sym06);
    }

    #[test]
    fn test_two_wilds_single_candidate_adds_center_right() {
        let mut grid = plain_grid();
        grid.set(0, 0, Symbol::Wild);
        grid.set(1, 1, Symbol::Wild);
        let mut two_wilds = ZERO;
        two_wilds[2][1] = MAX_WEIGHT;
        let mut rng = low_draws();

        let promoted = expand_wilds(&mut grid, &weights(ZERO, two_wilds), &mut rng).unwrap();
        assert_eq!(promoted, 2);
        assert_eq!(grid.get(2, 1), Symbol::Wild);
        assert_eq!(grid.get(4, 1), Symbol::Wild);
    }

    #[test]
    fn test_two_wilds_one_forced_cell_blocked_adds_center_right() {
        let mut grid = plain_grid();
        grid.set(0, 0, Symbol::Wild);
        grid.set(4, 0, Symbol::Wild);
        let mut rng = low_draws();

        let promoted = expand_wilds(&mut grid, &weights(ZERO, ZERO), &mut rng).unwrap();
        assert_eq!(promoted, 2);
        assert_eq!(grid.get(4, 1), Symbol::Wild);
        assert_eq!(grid.get(4, 2), Symbol::Wild);
    }

    #[test]
    fn test_weight_validation() {
        assert!(weights(FULL, ZERO).validate("base-1").is_ok());

        let mut bad = ZERO;
        bad[3][2] = 101;
        assert!(matches!(
            weights(ZERO, bad).validate("base-1"),
            Err(RtpError::WildWeightOutOfRange { reel: 3, row: 2, weight: 101, .. })
        ));
    }
}
