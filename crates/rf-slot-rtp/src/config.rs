//! Game tables and run options
//!
//! [`GameTables`] is the raw data set as loaded from YAML or JSON.
//! [`GameTables::prepare`] validates it and shuffles the draw
//! distributions exactly once, producing the immutable [`PreparedTables`]
//! every round reads from.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RtpError, RtpResult};
use crate::free_spins::BonusStage;
use crate::paytable::{PayTable, Paylines, ScatterMultipliers};
use crate::reels::{ReelCensus, ReelSet};
use crate::rng::RandomSource;
use crate::wilds::WildExpansionWeights;

const DEFAULT_TABLES_YAML: &str = include_str!("../data/default_tables.yaml");

// ═══════════════════════════════════════════════════════════════════════════════
// DISTRIBUTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Discrete distribution drawn by uniform index
///
/// Repeated values weight an outcome. The order is permuted once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution {
    values: Vec<u32>,
    #[serde(skip)]
    shuffled: bool,
}

impl Distribution {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            shuffled: false,
        }
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Non-empty, every value at least `min`
    pub fn validate(&self, name: &str, min: u32) -> RtpResult<()> {
        if self.values.is_empty() {
            return Err(RtpError::EmptyDistribution(name.to_string()));
        }
        if let Some(&value) = self.values.iter().find(|&&v| v < min) {
            return Err(RtpError::InvalidDistributionValue {
                name: name.to_string(),
                value,
            });
        }
        Ok(())
    }

    /// One uniform draw
    #[inline]
    pub fn draw(&self, rng: &mut dyn RandomSource) -> RtpResult<u32> {
        let index = rng.next_int(self.values.len() as u32)? as usize;
        self.values
            .get(index)
            .copied()
            .ok_or_else(|| RtpError::RandomSource(format!("index {index} out of range")))
    }

    /// Fisher-Yates, back to front
    pub fn shuffle(&mut self, rng: &mut dyn RandomSource) -> RtpResult<()> {
        if self.shuffled {
            return Err(RtpError::AlreadyShuffled);
        }
        for last in (1..self.values.len()).rev() {
            let r = rng.next_int(last as u32 + 1)? as usize;
            self.values.swap(last, r);
        }
        self.shuffled = true;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TABLES
// ═══════════════════════════════════════════════════════════════════════════════

/// A base game reel set with its expansion weights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseVariant {
    pub name: String,
    pub reels: ReelSet,
    pub wilds: WildExpansionWeights,
}

/// Reels, weights and retrigger distribution of one bonus stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusStageTables {
    pub name: String,
    pub reels: ReelSet,
    pub wilds: WildExpansionWeights,
    /// Spins awarded when this stage is entered on a retrigger
    pub scatter_distribution: Distribution,
}

/// Full data set of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTables {
    pub name: String,
    pub paytable: PayTable,
    pub scatter_multipliers: ScatterMultipliers,
    pub paylines: Paylines,
    pub base_variants: Vec<BaseVariant>,
    /// Zero-based indices into `base_variants`
    pub base_variant_distribution: Distribution,
    /// Spins awarded by a fresh trigger
    pub base_scatter_distribution: Distribution,
    pub free_multiplier_distribution: Distribution,
    /// Stage 1, 2 and 3 in order
    pub bonus_stages: [BonusStageTables; 3],
}

/// Named census entry for `--verify` style dumps
#[derive(Debug, Clone, Serialize)]
pub struct VariantCensus {
    pub name: String,
    pub census: ReelCensus,
}

impl GameTables {
    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> RtpResult<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> RtpResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> RtpResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The bundled sample game
    pub fn default_tables() -> RtpResult<Self> {
        Self::from_yaml(DEFAULT_TABLES_YAML)
    }

    /// Reject any inconsistency before a run starts
    pub fn validate(&self) -> RtpResult<()> {
        self.paytable.validate()?;
        self.paylines.validate()?;

        if self.base_variants.is_empty() {
            return Err(RtpError::NoBaseVariants);
        }
        for variant in &self.base_variants {
            variant.reels.validate(&variant.name)?;
            variant.wilds.validate(&variant.name)?;
        }

        self.base_variant_distribution
            .validate("base_variant_distribution", 0)?;
        let available = self.base_variants.len();
        if let Some(&index) = self
            .base_variant_distribution
            .values()
            .iter()
            .find(|&&i| i as usize >= available)
        {
            return Err(RtpError::UnknownBaseVariant {
                index: index as usize,
                available,
            });
        }

        self.base_scatter_distribution
            .validate("base_scatter_distribution", 1)?;
        self.free_multiplier_distribution
            .validate("free_multiplier_distribution", 1)?;

        for stage in &self.bonus_stages {
            stage.reels.validate(&stage.name)?;
            stage.wilds.validate(&stage.name)?;
            stage
                .scatter_distribution
                .validate(&format!("{} scatter_distribution", stage.name), 1)?;
        }
        Ok(())
    }

    /// Validate, shuffle every draw table once and freeze
    ///
    /// Shuffle order is free multiplier, base scatter, then stages 1 to 3.
    /// The base variant distribution keeps its configured order.
    pub fn prepare(mut self, rng: &mut dyn RandomSource) -> RtpResult<PreparedTables> {
        self.validate()?;

        self.free_multiplier_distribution.shuffle(rng)?;
        self.base_scatter_distribution.shuffle(rng)?;
        for stage in self.bonus_stages.iter_mut() {
            stage.scatter_distribution.shuffle(rng)?;
        }
        debug!(
            "Shuffled distributions for '{}' (multiplier {}, base scatter {}, stages {}/{}/{})",
            self.name,
            self.free_multiplier_distribution.len(),
            self.base_scatter_distribution.len(),
            self.bonus_stages[0].scatter_distribution.len(),
            self.bonus_stages[1].scatter_distribution.len(),
            self.bonus_stages[2].scatter_distribution.len(),
        );

        Ok(PreparedTables { tables: self })
    }

    /// Per-reel symbol counts of every reel set
    pub fn census(&self) -> Vec<VariantCensus> {
        let base = self.base_variants.iter().map(|v| (&v.name, &v.reels));
        let stages = self.bonus_stages.iter().map(|s| (&s.name, &s.reels));
        base.chain(stages)
            .map(|(name, reels)| VariantCensus {
                name: name.clone(),
                census: reels.census(),
            })
            .collect()
    }
}

/// Validated, shuffled tables shared read-only by every round
#[derive(Debug, Clone)]
pub struct PreparedTables {
    tables: GameTables,
}

impl PreparedTables {
    pub fn tables(&self) -> &GameTables {
        &self.tables
    }

    pub fn name(&self) -> &str {
        &self.tables.name
    }

    pub fn paytable(&self) -> &PayTable {
        &self.tables.paytable
    }

    pub fn paylines(&self) -> &Paylines {
        &self.tables.paylines
    }

    pub fn scatter_multipliers(&self) -> &ScatterMultipliers {
        &self.tables.scatter_multipliers
    }

    /// Stake of one base round
    pub fn stake(&self) -> u64 {
        self.tables.paylines.total_stake()
    }

    pub fn base_variant(&self, index: usize) -> RtpResult<&BaseVariant> {
        self.tables
            .base_variants
            .get(index)
            .ok_or(RtpError::UnknownBaseVariant {
                index,
                available: self.tables.base_variants.len(),
            })
    }

    /// Weighted pick of the reel set for a base round
    pub fn draw_base_variant(&self, rng: &mut dyn RandomSource) -> RtpResult<&BaseVariant> {
        let index = self.tables.base_variant_distribution.draw(rng)?;
        self.base_variant(index as usize)
    }

    pub fn base_scatter(&self) -> &Distribution {
        &self.tables.base_scatter_distribution
    }

    pub fn free_multiplier(&self) -> &Distribution {
        &self.tables.free_multiplier_distribution
    }

    pub fn stage(&self, stage: BonusStage) -> &BonusStageTables {
        &self.tables.bonus_stages[stage.index()]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUN OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Options for one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Base rounds to play
    pub rounds: u64,
    /// Fixed seed for a reproducible run; OS entropy when absent
    pub seed: Option<u64>,
    /// Play queued bonus rounds
    pub free_spins: bool,
    /// Wilds substitute for the anchor symbol
    pub wild_substitution: bool,
    /// Promote cells when one or two wilds are visible
    pub wild_expansion: bool,
    /// Report progress every this many rounds (0 disables)
    pub progress: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            rounds: 10_000_000,
            seed: None,
            free_spins: true,
            wild_substitution: true,
            wild_expansion: true,
            progress: 10_000_000,
        }
    }
}
