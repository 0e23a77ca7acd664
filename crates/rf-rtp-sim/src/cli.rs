//! Command line front end

use std::path::{Path, PathBuf};

use clap::Parser;

use rf_slot_rtp::{GameTables, SimulationOptions};

use crate::error::{SimError, SimResult};

#[derive(Parser, Debug)]
#[command(
    name = "rf-rtp-sim",
    version,
    about = "Monte Carlo RTP simulator for a 5x3, 50-line slot"
)]
pub struct Cli {
    /// Base rounds to play (accepts k/m suffixes, e.g. 100k, 10m)
    #[arg(short = 'g', long, default_value = "10m", value_parser = parse_count)]
    pub rounds: u64,

    /// Log progress every N rounds (0 disables)
    #[arg(short = 'p', long, default_value = "10m", value_parser = parse_count)]
    pub progress: u64,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Queue free spins but do not play them
    #[arg(long)]
    pub free_off: bool,

    /// Disable wild substitution
    #[arg(long)]
    pub wilds_off: bool,

    /// Disable wild expansion
    #[arg(long)]
    pub expand_off: bool,

    /// Game tables (.yaml, .yml or .json); bundled tables when omitted
    #[arg(long)]
    pub tables: Option<PathBuf>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Print the reel census of the tables and exit
    #[arg(long)]
    pub verify: bool,

    /// Emit the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn options(&self) -> SimulationOptions {
        SimulationOptions {
            rounds: self.rounds,
            seed: self.seed,
            free_spins: !self.free_off,
            wild_substitution: !self.wilds_off,
            wild_expansion: !self.expand_off,
            progress: self.progress,
        }
    }

    pub fn load_tables(&self) -> SimResult<GameTables> {
        match &self.tables {
            Some(path) => load_tables(path),
            None => Ok(GameTables::default_tables()?),
        }
    }
}

/// Parse a round count such as `500`, `100k`, `10m` or `1_000_000`
pub fn parse_count(value: &str) -> Result<u64, String> {
    parse_count_inner(value).ok_or_else(|| SimError::InvalidCount(value.to_string()).to_string())
}

fn parse_count_inner(value: &str) -> Option<u64> {
    let cleaned: String = value.trim().chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let (digits, scale) = match lower.strip_suffix('k') {
        Some(digits) => (digits, 1_000),
        None => match lower.strip_suffix('m') {
            Some(digits) => (digits, 1_000_000),
            None => (lower.as_str(), 1),
        },
    };
    digits.parse::<u64>().ok()?.checked_mul(scale)
}

/// Load tables by file extension
pub fn load_tables(path: &Path) -> SimResult<GameTables> {
    let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let tables = match extension.as_str() {
        "yaml" | "yml" => GameTables::from_yaml(&text)?,
        "json" => GameTables::from_json(&text)?,
        other => return Err(SimError::UnsupportedFormat(other.to_string())),
    };
    Ok(tables)
}
