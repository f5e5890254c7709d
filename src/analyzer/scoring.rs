//! Composite score calculation for catalog quality

use crate::analyzer::metrics::classifier_readiness::ClassifierReadinessMetrics;
use crate::analyzer::metrics::code_distribution::CodeDistributionMetrics;
use crate::analyzer::metrics::completeness::CompletenessMetrics;
use crate::analyzer::metrics::description_quality::DescriptionQualityMetrics;
use crate::config::{AnalyzerConfig, LevelThresholds};
use crate::{Finding, Flag, QualityLevel, ScoreBreakdown, ScoringWeights, Severity};

/// Sub-scores below this trigger a recommendation
const RECOMMENDATION_CUTOFF: f64 = 60.0;
/// Too-short description share (percent) above which a finding is raised
const TOO_SHORT_WARN_PCT: f64 = 10.0;
/// At most this many findings appear in the report
const MAX_FINDINGS: usize = 10;

/// Calculator for the overall catalog quality score.
///
/// Pure and deterministic: identical metric results always produce the
/// same overall score and label.
pub struct CompositeScorer;

impl CompositeScorer {
    /// Weighted overall score from the four sub-scores
    pub fn overall(weights: &ScoringWeights, breakdown: &ScoreBreakdown) -> f64 {
        let overall = weights.overall(breakdown).clamp(0.0, 100.0);
        (overall * 100.0).round() / 100.0
    }

    /// Quality label for an overall score
    pub fn label(score: f64, levels: &LevelThresholds) -> QualityLevel {
        QualityLevel::from_score(score, levels)
    }

    /// Get a description of the quality level
    pub fn level_description(level: QualityLevel) -> &'static str {
        match level {
            QualityLevel::Excellent => {
                "Excellent - The catalog is complete, descriptive and well balanced"
            }
            QualityLevel::Good => "Good - The catalog is solid with minor gaps",
            QualityLevel::Fair => "Fair - Usable, but several quality issues need attention",
            QualityLevel::Poor => "Poor - Significant gaps limit what this data can support",
            QualityLevel::Critical => "Critical - The catalog needs major cleanup before use",
        }
    }

    /// Get recommendations based on the weakest sub-scores
    pub fn recommendations(breakdown: &ScoreBreakdown) -> Vec<String> {
        let mut recs = Vec::new();

        if breakdown.completeness < RECOMMENDATION_CUTOFF {
            recs.push(
                "Fill in missing identifiers, descriptions and codes - completeness drags down every downstream use".to_string(),
            );
        }

        if breakdown.description_quality < RECOMMENDATION_CUTOFF {
            recs.push(
                "Rewrite short, numeric or duplicated descriptions with distinguishing product details".to_string(),
            );
        }

        if breakdown.code_distribution < RECOMMENDATION_CUTOFF {
            recs.push(
                "Consolidate rare codes and rebalance heavily concentrated categories".to_string(),
            );
        }

        if breakdown.classifier_readiness < RECOMMENDATION_CUTOFF {
            recs.push(
                "Collect more samples for small classes and resolve descriptions mapped to multiple codes".to_string(),
            );
        }

        if recs.is_empty() {
            recs.push(
                "The catalog is in good shape. Spot-check rare codes before training.".to_string(),
            );
        }

        recs
    }

    /// Extract the critical issues from all analyses, worst first, capped
    pub fn findings(
        completeness: &CompletenessMetrics,
        description: &DescriptionQualityMetrics,
        codes: &CodeDistributionMetrics,
        readiness: &ClassifierReadinessMetrics,
        config: &AnalyzerConfig,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        for column in &completeness.column_completeness {
            if column.completeness_pct < config.completeness.warn_below_pct {
                findings.push(Finding {
                    flag: Flag::LowCompleteness,
                    severity: Severity::Warning,
                    message: format!(
                        "Low completeness in {}: {:.1}%",
                        column.column, column.completeness_pct
                    ),
                });
            }
        }

        let too_short_pct = description.too_short as f64 / description.analyzed as f64 * 100.0;
        if too_short_pct > TOO_SHORT_WARN_PCT {
            findings.push(Finding {
                flag: Flag::TooShort,
                severity: Severity::Warning,
                message: format!("{too_short_pct:.1}% of descriptions are too short"),
            });
        }

        for column in &codes.columns {
            if column.rare_code_count > 0 {
                findings.push(Finding {
                    flag: Flag::RareCodes,
                    severity: Severity::Info,
                    message: format!(
                        "{}: {} codes occur below the rarity threshold",
                        column.column, column.rare_code_count
                    ),
                });
            }
        }

        if readiness.flags.contains(&Flag::InsufficientClasses) {
            findings.push(Finding {
                flag: Flag::InsufficientClasses,
                severity: Severity::Error,
                message: format!(
                    "{}: insufficient classes for training ({} distinct)",
                    readiness.target_column, readiness.unique_classes
                ),
            });
        }
        if readiness.ambiguous_descriptions > config.readiness.ambiguity_warn_count {
            findings.push(Finding {
                flag: Flag::AmbiguousDescriptions,
                severity: Severity::Warning,
                message: format!(
                    "{}: {} ambiguous descriptions (same text, different codes)",
                    readiness.target_column, readiness.ambiguous_descriptions
                ),
            });
        }
        if readiness.imbalance_ratio > config.readiness.imbalance_warn_ratio {
            findings.push(Finding {
                flag: Flag::ClassImbalance,
                severity: Severity::Warning,
                message: format!(
                    "{}: severe class imbalance (ratio: {:.1})",
                    readiness.target_column, readiness.imbalance_ratio
                ),
            });
        }

        findings.sort_by_key(|f| match f.severity {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        });
        findings.truncate(MAX_FINDINGS);
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overall_weighted_sum() {
        let breakdown = ScoreBreakdown {
            completeness: 90.0,
            description_quality: 70.0,
            code_distribution: 50.0,
            classifier_readiness: 30.0,
        };
        let overall = CompositeScorer::overall(&ScoringWeights::default(), &breakdown);
        // 0.3*90 + 0.3*70 + 0.2*50 + 0.2*30 = 64
        assert!((overall - 64.0).abs() < 1e-9);
        assert_eq!(
            CompositeScorer::label(overall, &LevelThresholds::default()),
            QualityLevel::Fair
        );
    }

    #[test]
    fn test_perfect_scores() {
        let breakdown = ScoreBreakdown {
            completeness: 100.0,
            description_quality: 100.0,
            code_distribution: 100.0,
            classifier_readiness: 100.0,
        };
        let overall = CompositeScorer::overall(&ScoringWeights::default(), &breakdown);
        assert!((overall - 100.0).abs() < 1e-9);
        assert_eq!(
            CompositeScorer::label(overall, &LevelThresholds::default()),
            QualityLevel::Excellent
        );
    }

    #[test]
    fn test_zero_scores() {
        let breakdown = ScoreBreakdown {
            completeness: 0.0,
            description_quality: 0.0,
            code_distribution: 0.0,
            classifier_readiness: 0.0,
        };
        let overall = CompositeScorer::overall(&ScoringWeights::default(), &breakdown);
        assert_eq!(overall, 0.0);
        assert_eq!(
            CompositeScorer::label(overall, &LevelThresholds::default()),
            QualityLevel::Critical
        );
    }

    #[test]
    fn test_deterministic() {
        let breakdown = ScoreBreakdown {
            completeness: 81.3,
            description_quality: 67.9,
            code_distribution: 44.4,
            classifier_readiness: 91.2,
        };
        let weights = ScoringWeights::default();
        let first = CompositeScorer::overall(&weights, &breakdown);
        let second = CompositeScorer::overall(&weights, &breakdown);
        assert_eq!(first, second);
    }

    #[test]
    fn test_recommendations_low_scores() {
        let breakdown = ScoreBreakdown {
            completeness: 10.0,
            description_quality: 10.0,
            code_distribution: 10.0,
            classifier_readiness: 10.0,
        };
        let recs = CompositeScorer::recommendations(&breakdown);
        assert_eq!(recs.len(), 4);
        assert!(recs[0].contains("missing"));
        assert!(recs[1].contains("descriptions"));
        assert!(recs[2].contains("rare codes"));
        assert!(recs[3].contains("samples"));
    }

    #[test]
    fn test_recommendations_high_scores() {
        let breakdown = ScoreBreakdown {
            completeness: 95.0,
            description_quality: 95.0,
            code_distribution: 95.0,
            classifier_readiness: 95.0,
        };
        let recs = CompositeScorer::recommendations(&breakdown);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("good shape"));
    }

    #[test]
    fn test_level_description_all_levels() {
        assert!(CompositeScorer::level_description(QualityLevel::Excellent).contains("Excellent"));
        assert!(CompositeScorer::level_description(QualityLevel::Good).contains("Good"));
        assert!(CompositeScorer::level_description(QualityLevel::Fair).contains("Fair"));
        assert!(CompositeScorer::level_description(QualityLevel::Poor).contains("Poor"));
        assert!(CompositeScorer::level_description(QualityLevel::Critical).contains("Critical"));
    }

    proptest! {
        #[test]
        fn prop_overall_bounded(
            a in 0.0f64..=100.0,
            b in 0.0f64..=100.0,
            c in 0.0f64..=100.0,
            d in 0.0f64..=100.0,
        ) {
            let breakdown = ScoreBreakdown {
                completeness: a,
                description_quality: b,
                code_distribution: c,
                classifier_readiness: d,
            };
            let overall = CompositeScorer::overall(&ScoringWeights::default(), &breakdown);
            prop_assert!((0.0..=100.0).contains(&overall));
        }
    }
}
