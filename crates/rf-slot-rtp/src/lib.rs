//! # rf-slot-rtp: Line game evaluation engine for RTP simulation
//!
//! Plays millions of independent rounds of a five-reel, three-row, 50-line
//! slot and accumulates the counters needed to estimate return-to-player
//! and hit frequencies.
//!
//! ## Features
//!
//! - **Reel Spinner**: circular strips, one uniform stop per reel
//! - **Line Evaluator**: anchor search, wild substitution, left-aligned runs
//! - **Wild Expander**: probabilistic promotion when 1 or 2 wilds show
//! - **Free Spins**: FIFO batches with three nested retrigger stages
//! - **Statistics**: mergeable per-mode and per-symbol counters
//!
//! ## Architecture
//!
//! ```text
//! RoundEngine
//!     │
//!     ├── ViewGrid::spin        (base variant or bonus stage reels)
//!     ├── FreeSpinSession       (scatter trigger / retrigger)
//!     ├── expand_wilds          (1 or 2 wilds in view)
//!     └── LineEvaluator × 50
//!           │
//!           v
//!     RunStatistics
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod free_spins;
pub mod paytable;
pub mod reels;
pub mod rng;
pub mod stats;
pub mod symbols;
pub mod wilds;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use free_spins::*;
pub use paytable::*;
pub use reels::*;
pub use rng::*;
pub use stats::*;
pub use symbols::*;
pub use wilds::*;
