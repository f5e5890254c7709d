//! Catq: Data Quality Analyzer for product catalogs
//!
//! This library computes descriptive quality scores over a tabular product
//! catalog: completeness of mapped columns, description text-quality
//! heuristics, categorical code-distribution statistics, and classifier
//! training readiness, combined into one weighted overall score.

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod error;
pub mod reporter;

use serde::{Deserialize, Serialize};

pub use analyzer::engine::AnalysisEngine;
pub use catalog::{Catalog, ColumnMapping};
pub use config::AnalyzerConfig;
pub use error::AnalysisError;

use analyzer::metrics::classifier_readiness::ClassifierReadinessMetrics;
use analyzer::metrics::code_distribution::CodeDistributionMetrics;
use analyzer::metrics::completeness::CompletenessMetrics;
use analyzer::metrics::description_quality::DescriptionQualityMetrics;

/// The full report for one analysis run. Created once per run, serialized
/// for export, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogReport {
    /// Weighted overall quality score (0-100)
    pub overall_score: f64,
    /// Quality label derived from the overall score
    pub label: QualityLevel,
    /// Completeness metrics (column null rates, row code coverage)
    pub completeness: CompletenessMetrics,
    /// Description text-quality metrics
    pub description_quality: DescriptionQualityMetrics,
    /// Code distribution metrics (cardinality, rarity, entropy)
    pub code_distribution: CodeDistributionMetrics,
    /// Classifier training readiness metrics
    pub classifier_readiness: ClassifierReadinessMetrics,
    /// Basic information about the analyzed table
    pub dataset: DatasetInfo,
    /// Critical issues surfaced across all analyzers (capped at 10)
    pub findings: Vec<Finding>,
    /// Actionable recommendations based on the weakest sub-scores
    pub recommendations: Vec<String>,
    /// When this report was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Basic facts about the analyzed catalog and its column mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub total_rows: usize,
    pub total_columns: usize,
    pub id_column: String,
    pub description_column: String,
    pub code_columns: Vec<String>,
}

/// Quality label for a score, via ordered threshold lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl QualityLevel {
    /// Map a 0-100 score to its label using the configured cutoffs
    pub fn from_score(score: f64, levels: &config::LevelThresholds) -> Self {
        if score >= levels.excellent {
            QualityLevel::Excellent
        } else if score >= levels.good {
            QualityLevel::Good
        } else if score >= levels.fair {
            QualityLevel::Fair
        } else if score >= levels.poor {
            QualityLevel::Poor
        } else {
            QualityLevel::Critical
        }
    }
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityLevel::Excellent => write!(f, "excellent"),
            QualityLevel::Good => write!(f, "good"),
            QualityLevel::Fair => write!(f, "fair"),
            QualityLevel::Poor => write!(f, "poor"),
            QualityLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Qualitative flags raised by the analyzers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    /// Descriptions below the minimum length
    TooShort,
    /// Descriptions that are mostly numeric characters
    MostlyNumeric,
    /// Descriptions with a high density of special characters
    SpecialCharacters,
    /// One or more mapped columns have low completeness
    LowCompleteness,
    /// Code values occurring below the rarity threshold
    RareCodes,
    /// Fewer than 2 distinct classes in the classification target
    InsufficientClasses,
    /// Classes below the minimum training sample count
    SparseClasses,
    /// Severe imbalance between the largest and smallest class
    ClassImbalance,
    /// Identical descriptions mapped to different target codes
    AmbiguousDescriptions,
}

/// Which metric a flag belongs to, for grouped display
pub fn flag_metric(flag: &Flag) -> &'static str {
    use Flag::*;
    match flag {
        LowCompleteness => "Completeness",
        TooShort | MostlyNumeric | SpecialCharacters => "Description Quality",
        RareCodes => "Code Distribution",
        InsufficientClasses | SparseClasses | ClassImbalance | AmbiguousDescriptions => {
            "Classifier Readiness"
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flag::TooShort => write!(f, "too-short"),
            Flag::MostlyNumeric => write!(f, "mostly-numeric"),
            Flag::SpecialCharacters => write!(f, "special-characters"),
            Flag::LowCompleteness => write!(f, "low-completeness"),
            Flag::RareCodes => write!(f, "rare-codes"),
            Flag::InsufficientClasses => write!(f, "insufficient-classes"),
            Flag::SparseClasses => write!(f, "sparse-classes"),
            Flag::ClassImbalance => write!(f, "class-imbalance"),
            Flag::AmbiguousDescriptions => write!(f, "ambiguous-descriptions"),
        }
    }
}

/// A critical issue surfaced in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Flag that produced this finding
    pub flag: Flag,
    /// Severity of the finding
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

/// The four sub-scores feeding the composite scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub completeness: f64,
    pub description_quality: f64,
    pub code_distribution: f64,
    pub classifier_readiness: f64,
}

/// Weights for combining the four sub-scores (must sum to 1.0)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub completeness: f64,
    pub description_quality: f64,
    pub code_distribution: f64,
    pub classifier_readiness: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            completeness: 0.30,
            description_quality: 0.30,
            code_distribution: 0.20,
            classifier_readiness: 0.20,
        }
    }
}

impl ScoringWeights {
    /// Reject weight sets that are negative or do not sum to 1.0
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let parts = [
            self.completeness,
            self.description_quality,
            self.code_distribution,
            self.classifier_readiness,
        ];
        let sum: f64 = parts.iter().sum();
        if parts.iter().any(|w| *w < 0.0) || (sum - 1.0).abs() > 1e-6 {
            return Err(AnalysisError::InvalidWeights { sum });
        }
        Ok(())
    }

    /// Weighted overall score from the four sub-scores
    pub fn overall(&self, breakdown: &ScoreBreakdown) -> f64 {
        self.completeness * breakdown.completeness
            + self.description_quality * breakdown.description_quality
            + self.code_distribution * breakdown.code_distribution
            + self.classifier_readiness * breakdown.classifier_readiness
    }
}

/// Public API: analyze an in-memory catalog with an explicit column mapping.
pub fn analyze_catalog(
    catalog: &Catalog,
    mapping: &ColumnMapping,
    config: &AnalyzerConfig,
) -> Result<CatalogReport, AnalysisError> {
    AnalysisEngine::new(config.clone()).analyze(catalog, mapping)
}

/// Public API: load a CSV file and analyze it. When `mapping` is None the
/// column mapping is auto-detected from the header names.
pub fn analyze_csv_path(
    path: &std::path::Path,
    mapping: Option<&ColumnMapping>,
    config: &AnalyzerConfig,
) -> Result<CatalogReport, AnalysisError> {
    let catalog = Catalog::from_csv_path(path)?;
    let detected;
    let mapping = match mapping {
        Some(m) => m,
        None => {
            detected = ColumnMapping::detect(&catalog)?;
            &detected
        }
    };
    analyze_catalog(&catalog, mapping, config)
}
