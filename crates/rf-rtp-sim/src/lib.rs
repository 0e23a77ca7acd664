//! # rf-rtp-sim: Batch RTP simulation for rf-slot-rtp
//!
//! Parallel batch runner, run reports and the command line front end.

pub mod batch;
pub mod cli;
pub mod error;
pub mod report;

pub use batch::*;
pub use cli::*;
pub use error::*;
pub use report::*;
