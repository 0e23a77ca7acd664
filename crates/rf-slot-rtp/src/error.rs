//! Error types for the RTP engine

use thiserror::Error;

/// Engine error type
///
/// Every variant is fatal for the run: configuration problems are caught
/// before the first round, random source failures abort mid-run.
#[derive(Error, Debug)]
pub enum RtpError {
    #[error("Unknown symbol id: {0}")]
    UnknownSymbol(u8),

    #[error("Payline {line} references row {row} (grid has {rows} rows)")]
    PaylineRowOutOfRange { line: usize, row: u8, rows: usize },

    #[error("Expected {expected} paylines, got {actual}")]
    PaylineCount { expected: usize, actual: usize },

    #[error("Reel strip {reel} of '{variant}' is empty")]
    EmptyReelStrip { variant: String, reel: usize },

    #[error("Reel set '{variant}' carries the synthetic wild on reel {reel}")]
    SyntheticWildOnStrip { variant: String, reel: usize },

    #[error("Reel set '{variant}' has {actual} strips, expected {expected}")]
    ReelCount {
        variant: String,
        expected: usize,
        actual: usize,
    },

    #[error("Symbol {symbol} cannot pay but has {pay} credits for run length {run}")]
    NonPayingSymbolPays { symbol: u8, run: usize, pay: u32 },

    #[error("Wild weight {weight} at reel {reel}, row {row} of '{variant}' is outside 0..=100")]
    WildWeightOutOfRange {
        variant: String,
        reel: usize,
        row: usize,
        weight: u8,
    },

    #[error("Distribution '{0}' is empty")]
    EmptyDistribution(String),

    #[error("Distribution '{name}' contains invalid value {value}")]
    InvalidDistributionValue { name: String, value: u32 },

    #[error("Base variant distribution points at variant {index}, only {available} configured")]
    UnknownBaseVariant { index: usize, available: usize },

    #[error("No base reel variants configured")]
    NoBaseVariants,

    #[error("Scatter count {count} exceeds multiplier table (max {max})")]
    ScatterCountOutOfRange { count: usize, max: usize },

    #[error("Random bound must be positive")]
    InvalidRandomBound,

    #[error("Random source exhausted")]
    RandomSourceExhausted,

    #[error("Random source failure: {0}")]
    RandomSource(String),

    #[error("Line win overflow: {pay} credits x{multiplier}")]
    WinOverflow { pay: u64, multiplier: u64 },

    #[error("Distribution tables already shuffled")]
    AlreadyShuffled,

    #[error("Failed to parse JSON tables: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML tables: {0}")]
    Yaml(#[from] serde_yml::Error),
}

/// Result type alias
pub type RtpResult<T> = Result<T, RtpError>;
