//! Tabular reporter: one row per metric with its key statistics

use crate::error::AnalysisError;
use crate::CatalogReport;

/// Reporter for CSV export
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render the report as CSV: `metric_name, sub_score, key_statistics`
    pub fn report(&self, report: &CatalogReport) -> Result<String, AnalysisError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["metric_name", "sub_score", "key_statistics"])?;

        let comp = &report.completeness;
        writer.write_record([
            "completeness",
            &format_score(comp.sub_score),
            &format!(
                "mean_column_completeness={}; mean_row_coverage={}; rows_all_codes={}; rows_no_codes={}; avg_codes_per_row={}",
                comp.mean_column_completeness,
                comp.mean_row_coverage,
                comp.rows_all_codes,
                comp.rows_no_codes,
                comp.avg_codes_per_row
            ),
        ])?;

        let desc = &report.description_quality;
        writer.write_record([
            "description_quality",
            &format_score(desc.sub_score),
            &format!(
                "mean_length={}; vocabulary_richness={}; duplicate_ratio={}; too_short={}; mostly_numeric={}; special_characters={}",
                desc.length.mean,
                desc.vocabulary_richness,
                desc.duplicate_ratio,
                desc.too_short,
                desc.mostly_numeric,
                desc.special_characters
            ),
        ])?;

        let codes = &report.code_distribution;
        writer.write_record([
            "code_distribution",
            &format_score(codes.sub_score),
            &format!(
                "mean_normalized_entropy={}; rare_row_fraction={}; columns={}",
                codes.mean_normalized_entropy,
                codes.rare_row_fraction,
                codes.columns.len()
            ),
        ])?;

        let ready = &report.classifier_readiness;
        writer.write_record([
            "classifier_readiness",
            &format_score(ready.sub_score),
            &format!(
                "target={}; unique_classes={}; class_balance={}; ambiguous_descriptions={}; split={}",
                ready.target_column,
                ready.unique_classes,
                ready.class_balance,
                ready.ambiguous_descriptions,
                ready.split_recommendation
            ),
        ])?;

        writer.write_record([
            "overall",
            &format_score(report.overall_score),
            &format!("label={}", report.label),
        ])?;

        writer.flush()?;
        let bytes = writer
            .into_inner()
            .map_err(|e| AnalysisError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_score(score: f64) -> String {
    format!("{score:.2}")
}
