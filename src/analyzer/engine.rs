//! Analysis engine: validates the input, runs the four analyzers, and
//! assembles the composite report.
//!
//! The analyzers are independent pure passes over the same immutable
//! catalog; the engine aborts on the first failure and never emits a
//! partial report.

use crate::analyzer::metrics::{
    ClassifierReadinessAnalyzer, CodeDistributionAnalyzer, CompletenessAnalyzer,
    DescriptionQualityAnalyzer,
};
use crate::analyzer::scoring::CompositeScorer;
use crate::catalog::{Catalog, ColumnMapping};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::{CatalogReport, DatasetInfo, ScoreBreakdown};

pub struct AnalysisEngine {
    config: AnalyzerConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run the full pipeline over one catalog snapshot
    pub fn analyze(
        &self,
        catalog: &Catalog,
        mapping: &ColumnMapping,
    ) -> Result<CatalogReport, AnalysisError> {
        self.config.validate()?;
        mapping.validate(catalog)?;
        if catalog.row_count() == 0 {
            return Err(AnalysisError::InsufficientData(
                "catalog has no rows".to_string(),
            ));
        }
        for column in mapping.all_columns() {
            let index = catalog.require_column(column)?;
            if catalog.non_missing_count(index) == 0 {
                return Err(AnalysisError::EmptyColumn {
                    column: column.to_string(),
                });
            }
        }

        let completeness =
            CompletenessAnalyzer::analyze(catalog, mapping, &self.config.completeness)?;
        let description_quality = DescriptionQualityAnalyzer::analyze(
            catalog,
            &mapping.description_column,
            &self.config.description,
        )?;
        let code_distribution =
            CodeDistributionAnalyzer::analyze(catalog, &mapping.code_columns, &self.config.codes)?;
        let classifier_readiness = ClassifierReadinessAnalyzer::analyze(
            catalog,
            &mapping.description_column,
            mapping.primary_code_column(),
            &self.config.readiness,
        )?;

        let breakdown = ScoreBreakdown {
            completeness: completeness.sub_score,
            description_quality: description_quality.sub_score,
            code_distribution: code_distribution.sub_score,
            classifier_readiness: classifier_readiness.sub_score,
        };
        let overall_score = CompositeScorer::overall(&self.config.weights, &breakdown);
        let label = CompositeScorer::label(overall_score, &self.config.levels);
        let findings = CompositeScorer::findings(
            &completeness,
            &description_quality,
            &code_distribution,
            &classifier_readiness,
            &self.config,
        );
        let recommendations = CompositeScorer::recommendations(&breakdown);

        Ok(CatalogReport {
            overall_score,
            label,
            completeness,
            description_quality,
            code_distribution,
            classifier_readiness,
            dataset: DatasetInfo {
                total_rows: catalog.row_count(),
                total_columns: catalog.columns().len(),
                id_column: mapping.id_column.clone(),
                description_column: mapping.description_column.clone(),
                code_columns: mapping.code_columns.clone(),
            },
            findings,
            recommendations,
            generated_at: chrono::Utc::now(),
        })
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QualityLevel;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::default()
    }

    fn mapping() -> ColumnMapping {
        ColumnMapping::new("id", "desc", vec!["code".into()])
    }

    fn healthy_catalog() -> Catalog {
        let rows: Vec<Vec<String>> = (0..100)
            .map(|i| {
                vec![
                    format!("P{i}"),
                    format!("A thoroughly described product number {i}"),
                    format!("CODE{}", i % 4),
                ]
            })
            .collect();
        Catalog::new(vec!["id".into(), "desc".into(), "code".into()], rows)
    }

    #[test]
    fn test_healthy_catalog_end_to_end() {
        let report = engine().analyze(&healthy_catalog(), &mapping()).unwrap();
        assert!((report.completeness.sub_score - 100.0).abs() < 1e-9);
        assert!((report.code_distribution.mean_normalized_entropy - 1.0).abs() < 1e-9);
        assert!(report.overall_score > 60.0);
        assert_eq!(report.dataset.total_rows, 100);
        assert_eq!(report.dataset.code_columns, vec!["code"]);
    }

    #[test]
    fn test_empty_table_aborts() {
        let catalog = Catalog::new(
            vec!["id".into(), "desc".into(), "code".into()],
            vec![],
        );
        let result = engine().analyze(&catalog, &mapping());
        assert!(matches!(result, Err(AnalysisError::InsufficientData(_))));
    }

    #[test]
    fn test_missing_mapped_column_aborts() {
        let catalog = Catalog::new(vec!["id".into(), "desc".into()], vec![]);
        let result = engine().analyze(&catalog, &mapping());
        assert!(matches!(
            result,
            Err(AnalysisError::MissingColumn { column }) if column == "code"
        ));
    }

    #[test]
    fn test_entirely_empty_mapped_column_aborts() {
        let catalog = Catalog::new(
            vec!["id".into(), "desc".into(), "code".into()],
            vec![
                vec!["P1".into(), "A described product".into(), "".into()],
                vec!["P2".into(), "Another described product".into(), " ".into()],
            ],
        );
        let result = engine().analyze(&catalog, &mapping());
        assert!(matches!(
            result,
            Err(AnalysisError::EmptyColumn { column }) if column == "code"
        ));
    }

    #[test]
    fn test_invalid_config_aborts_before_analysis() {
        let mut config = AnalyzerConfig::default();
        config.weights.completeness = 0.9;
        let result = AnalysisEngine::new(config).analyze(&healthy_catalog(), &mapping());
        assert!(matches!(result, Err(AnalysisError::InvalidWeights { .. })));
    }

    #[test]
    fn test_overall_matches_weighted_subscores() {
        let report = engine().analyze(&healthy_catalog(), &mapping()).unwrap();
        let expected = 0.30 * report.completeness.sub_score
            + 0.30 * report.description_quality.sub_score
            + 0.20 * report.code_distribution.sub_score
            + 0.20 * report.classifier_readiness.sub_score;
        assert!((report.overall_score - expected).abs() < 0.01);
    }

    #[test]
    fn test_single_class_catalog_reports_zero_readiness() {
        let rows: Vec<Vec<String>> = (0..10)
            .map(|i| {
                vec![
                    format!("P{i}"),
                    format!("A thoroughly described product number {i}"),
                    "ONLY".to_string(),
                ]
            })
            .collect();
        let catalog = Catalog::new(vec!["id".into(), "desc".into(), "code".into()], rows);
        let report = engine().analyze(&catalog, &mapping()).unwrap();
        assert_eq!(report.classifier_readiness.sub_score, 0.0);
        assert!(report
            .classifier_readiness
            .flags
            .contains(&crate::Flag::InsufficientClasses));
        assert!(report
            .findings
            .iter()
            .any(|f| f.message.contains("insufficient classes for training")));
    }

    #[test]
    fn test_label_reflects_thresholds() {
        let report = engine().analyze(&healthy_catalog(), &mapping()).unwrap();
        let expected = QualityLevel::from_score(report.overall_score, &engine().config().levels);
        assert_eq!(report.label, expected);
    }
}
