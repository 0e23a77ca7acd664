//! Free spin scheduling
//!
//! A FIFO of pending bonus rounds. The queue being non-empty is the only
//! signal for free mode: the head entry stays queued while its round is
//! played and is popped by the caller afterwards.
//!
//! Stage progression on retrigger is Stage1 -> Stage2 -> Stage3 -> Stage3.

use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::PreparedTables;
use crate::error::RtpResult;
use crate::reels::ViewGrid;
use crate::rng::RandomSource;

/// Scatters needed to trigger or retrigger
pub const TRIGGER_SCATTERS: usize = 3;

// ═══════════════════════════════════════════════════════════════════════════════
// STAGES
// ═══════════════════════════════════════════════════════════════════════════════

/// Bonus stage an entry is played on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusStage {
    Stage1,
    Stage2,
    Stage3,
}

impl BonusStage {
    pub const ALL: [BonusStage; 3] = [Self::Stage1, Self::Stage2, Self::Stage3];

    /// Stage entered on a retrigger; Stage3 is terminal
    pub fn next(self) -> Self {
        match self {
            Self::Stage1 => Self::Stage2,
            Self::Stage2 | Self::Stage3 => Self::Stage3,
        }
    }

    /// Zero-based position in the stage tables
    pub fn index(self) -> usize {
        match self {
            Self::Stage1 => 0,
            Self::Stage2 => 1,
            Self::Stage3 => 2,
        }
    }
}

impl std::fmt::Display for BonusStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {}", self.index() + 1)
    }
}

/// One pending bonus round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSpinEntry {
    /// 1-based position within the batch that queued it
    pub ordinal: u32,
    pub stage: BonusStage,
}

/// What the scheduler did for one spun grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    None,
    /// Fresh batch from the base game
    Started { spins: u32, multiplier: u32 },
    /// Extra batch appended during a bonus sequence
    Retriggered { stage: BonusStage, spins: u32 },
}

/// Scheduler result for one spun grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Total-stake multiplier for the visible scatters
    pub scatter_multiplier: u32,
    pub trigger: Trigger,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Queue of pending bonus rounds plus the batch win multiplier
#[derive(Debug, Clone)]
pub struct FreeSpinSession {
    queue: VecDeque<FreeSpinEntry>,
    win_multiplier: u32,
}

impl Default for FreeSpinSession {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            win_multiplier: 1,
        }
    }
}

impl FreeSpinSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any entry is queued
    pub fn is_active(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn front(&self) -> Option<&FreeSpinEntry> {
        self.queue.front()
    }

    pub fn pop_front(&mut self) -> Option<FreeSpinEntry> {
        self.queue.pop_front()
    }

    pub fn entries(&self) -> impl Iterator<Item = &FreeSpinEntry> {
        self.queue.iter()
    }

    /// Batch multiplier, 1 outside free mode
    pub fn win_multiplier(&self) -> u32 {
        self.win_multiplier
    }

    /// Multiplier to apply to line wins, if in free mode
    pub fn line_multiplier(&self) -> Option<u32> {
        self.is_active().then_some(self.win_multiplier)
    }

    /// Drop everything; returns how many entries were still queued
    pub fn reset(&mut self) -> usize {
        let leftover = self.queue.len();
        self.queue.clear();
        self.win_multiplier = 1;
        leftover
    }

    fn enqueue(&mut self, stage: BonusStage, spins: u32) {
        self.queue
            .extend((1..=spins).map(|ordinal| FreeSpinEntry { ordinal, stage }));
    }

    /// Decide the trigger for a freshly spun grid
    ///
    /// Runs before wild expansion so expanded wilds never affect it.
    pub fn schedule(
        &mut self,
        grid: &ViewGrid,
        tables: &PreparedTables,
        rng: &mut dyn RandomSource,
    ) -> RtpResult<Schedule> {
        let scatters = grid.scatter_count();
        let scatter_multiplier = tables.scatter_multipliers().multiplier(scatters)?;

        if scatters < TRIGGER_SCATTERS {
            return Ok(Schedule {
                scatter_multiplier,
                trigger: Trigger::None,
            });
        }

        let trigger = match self.queue.back().map(|entry| entry.stage) {
            None => {
                let spins = tables.base_scatter().draw(rng)?;
                let multiplier = tables.free_multiplier().draw(rng)?;
                self.win_multiplier = multiplier;
                self.enqueue(BonusStage::Stage1, spins);
                debug!("Free spins triggered: {spins} spins at x{multiplier} ({scatters} scatters)");
                Trigger::Started { spins, multiplier }
            }
            Some(current) => {
                let stage = current.next();
                let spins = tables.stage(stage).scatter_distribution.draw(rng)?;
                self.enqueue(stage, spins);
                debug!(
                    "Free spins retriggered: {spins} more on {stage}, {} queued",
                    self.queue.len()
                );
                Trigger::Retriggered { stage, spins }
            }
        };

        Ok(Schedule {
            scatter_multiplier,
            trigger,
        })
    }
}
