//! Config schema and deserialization
//!
//! Every tunable the scorers use lives here rather than in the code:
//! composite weights, label cutoffs, flag thresholds, and penalty caps.
//! All fields default so a config file only has to name what it changes.

use crate::catalog::ColumnMapping;
use crate::error::AnalysisError;
use crate::ScoringWeights;
use serde::{Deserialize, Serialize};

/// Root config structure for .catqrc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalyzerConfig {
    /// Composite weights for the four sub-scores
    pub weights: ScoringWeights,

    /// Score-to-label cutoffs for the quality level
    pub levels: LevelThresholds,

    /// Minimum overall score (CLI exits 1 below it)
    pub threshold: Option<f64>,

    /// Optional fixed column mapping (CLI flags override, auto-detect
    /// fills in when neither is given)
    pub mapping: Option<ColumnMapping>,

    pub completeness: CompletenessTuning,
    pub description: DescriptionTuning,
    pub codes: CodeTuning,
    pub readiness: ReadinessTuning,
}

impl AnalyzerConfig {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<f64>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        self
    }

    /// Reject configs that cannot produce a meaningful score
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.weights.validate()?;
        self.completeness.blend_weights().validate_pair()?;
        self.readiness.blend_weights().validate_pair()?;
        Ok(())
    }
}

/// Ordered cutoffs for the quality label. A score at or above a cutoff
/// earns that label; anything below `poor` is critical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            good: 75.0,
            fair: 60.0,
            poor: 40.0,
        }
    }
}

/// A pair of blend weights that must sum to 1.0
#[derive(Debug, Clone, Copy)]
pub struct BlendWeights {
    pub first: f64,
    pub second: f64,
}

impl BlendWeights {
    pub fn validate_pair(&self) -> Result<(), AnalysisError> {
        let sum = self.first + self.second;
        if self.first < 0.0 || self.second < 0.0 || (sum - 1.0).abs() > 1e-6 {
            return Err(AnalysisError::InvalidWeights { sum });
        }
        Ok(())
    }
}

/// Completeness sub-score blend (equal weights by default)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessTuning {
    /// Weight of mean column completeness in the sub-score
    pub column_weight: f64,
    /// Weight of mean row code coverage in the sub-score
    pub row_weight: f64,
    /// Columns below this completeness percentage raise a finding
    pub warn_below_pct: f64,
}

impl Default for CompletenessTuning {
    fn default() -> Self {
        Self {
            column_weight: 0.5,
            row_weight: 0.5,
            warn_below_pct: 80.0,
        }
    }
}

impl CompletenessTuning {
    pub fn blend_weights(&self) -> BlendWeights {
        BlendWeights {
            first: self.column_weight,
            second: self.row_weight,
        }
    }
}

/// Description quality thresholds and penalty tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionTuning {
    /// Descriptions shorter than this (characters) are flagged too-short
    pub min_length: usize,
    /// Digit-character share at or above which a description is
    /// flagged mostly-numeric
    pub mostly_numeric_ratio: f64,
    /// Special-character share above which a description is flagged
    pub special_char_ratio: f64,
    /// Penalty caps, in score points, for each incidence rate
    pub short_penalty_cap: f64,
    pub duplicate_penalty_cap: f64,
    pub numeric_penalty_cap: f64,
    pub special_penalty_cap: f64,
    /// Vocabulary richness adjustment: (richness - baseline) * weight
    pub richness_weight: f64,
    pub richness_baseline: f64,
    /// How many of the most repeated descriptions to report
    pub top_duplicates: usize,
}

impl Default for DescriptionTuning {
    fn default() -> Self {
        Self {
            min_length: 20,
            mostly_numeric_ratio: 0.5,
            special_char_ratio: 0.3,
            short_penalty_cap: 30.0,
            duplicate_penalty_cap: 20.0,
            numeric_penalty_cap: 20.0,
            special_penalty_cap: 10.0,
            richness_weight: 10.0,
            richness_baseline: 0.3,
            top_duplicates: 10,
        }
    }
}

/// Code distribution thresholds and scoring tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeTuning {
    /// A value is rare when its frequency is below this fraction of rows
    pub rare_threshold: f64,
    /// How strongly the rare-value row fraction discounts the entropy score
    pub rare_penalty_weight: f64,
    /// Compute pairwise code co-occurrence (first three code columns)
    pub co_occurrence: bool,
    /// How many most-common values to report per column
    pub top_values: usize,
    /// Cap on the number of rare values listed per column
    pub max_rare_listed: usize,
}

impl Default for CodeTuning {
    fn default() -> Self {
        Self {
            rare_threshold: 0.01,
            rare_penalty_weight: 0.5,
            co_occurrence: true,
            top_values: 10,
            max_rare_listed: 20,
        }
    }
}

/// Classifier readiness thresholds and scoring tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessTuning {
    /// Minimum samples per class for training viability
    pub min_samples: usize,
    /// Weight of sample sufficiency in the sub-score
    pub sufficiency_weight: f64,
    /// Weight of class balance in the sub-score
    pub balance_weight: f64,
    /// Ambiguous description count above which a finding is raised
    pub ambiguity_warn_count: usize,
    /// Max/min class size ratio above which a finding is raised
    pub imbalance_warn_ratio: f64,
}

impl Default for ReadinessTuning {
    fn default() -> Self {
        Self {
            min_samples: 50,
            sufficiency_weight: 0.6,
            balance_weight: 0.4,
            ambiguity_warn_count: 10,
            imbalance_warn_ratio: 100.0,
        }
    }
}

impl ReadinessTuning {
    pub fn blend_weights(&self) -> BlendWeights {
        BlendWeights {
            first: self.sufficiency_weight,
            second: self.balance_weight,
        }
    }
}
