//! Completeness analysis: per-column null rates and per-row code coverage

use super::round2;
use crate::catalog::{is_missing, Catalog, ColumnMapping};
use crate::config::CompletenessTuning;
use crate::error::AnalysisError;
use crate::Flag;
use serde::{Deserialize, Serialize};

/// Completeness of one mapped column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnCompleteness {
    pub column: String,
    pub non_missing: usize,
    pub missing: usize,
    /// non_missing / total_rows, as a percentage
    pub completeness_pct: f64,
}

/// Metric result for the completeness analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessMetrics {
    /// Sub-score (0-100): blend of mean column completeness and mean
    /// row code coverage
    pub sub_score: f64,
    pub total_rows: usize,
    /// Per mapped column, in mapping order
    pub column_completeness: Vec<ColumnCompleteness>,
    pub mean_column_completeness: f64,
    /// Mean over rows of (non-missing code cells / code column count),
    /// as a percentage
    pub mean_row_coverage: f64,
    pub rows_all_codes: usize,
    pub rows_no_codes: usize,
    pub rows_partial_codes: usize,
    pub avg_codes_per_row: f64,
    pub flags: Vec<Flag>,
}

pub struct CompletenessAnalyzer;

impl CompletenessAnalyzer {
    pub fn analyze(
        catalog: &Catalog,
        mapping: &ColumnMapping,
        tuning: &CompletenessTuning,
    ) -> Result<CompletenessMetrics, AnalysisError> {
        let total_rows = catalog.row_count();
        if total_rows == 0 {
            return Err(AnalysisError::InsufficientData(
                "catalog has no rows".to_string(),
            ));
        }
        // Row coverage divides by the code column count
        if mapping.code_columns.is_empty() {
            return Err(AnalysisError::CodeColumnCount { count: 0 });
        }

        let mut column_completeness = Vec::new();
        for column in mapping.all_columns() {
            let index = catalog.require_column(column)?;
            let non_missing = catalog.non_missing_count(index);
            column_completeness.push(ColumnCompleteness {
                column: column.to_string(),
                non_missing,
                missing: total_rows - non_missing,
                completeness_pct: round2(non_missing as f64 / total_rows as f64 * 100.0),
            });
        }

        let code_indices: Vec<usize> = mapping
            .code_columns
            .iter()
            .map(|c| catalog.require_column(c))
            .collect::<Result<_, _>>()?;
        let code_count = code_indices.len();

        let mut rows_all_codes = 0usize;
        let mut rows_no_codes = 0usize;
        let mut coverage_sum = 0.0;
        let mut codes_present_sum = 0usize;
        for row in catalog.rows() {
            let present = code_indices
                .iter()
                .filter(|&&i| !is_missing(&row[i]))
                .count();
            if present == code_count {
                rows_all_codes += 1;
            } else if present == 0 {
                rows_no_codes += 1;
            }
            codes_present_sum += present;
            coverage_sum += present as f64 / code_count as f64;
        }
        let rows_partial_codes = total_rows - rows_all_codes - rows_no_codes;

        let mean_column_completeness = column_completeness
            .iter()
            .map(|c| c.completeness_pct)
            .sum::<f64>()
            / column_completeness.len() as f64;
        let mean_row_coverage = coverage_sum / total_rows as f64 * 100.0;

        let sub_score = (tuning.column_weight * mean_column_completeness
            + tuning.row_weight * mean_row_coverage)
            .clamp(0.0, 100.0);

        let mut flags = Vec::new();
        if column_completeness
            .iter()
            .any(|c| c.completeness_pct < tuning.warn_below_pct)
        {
            flags.push(Flag::LowCompleteness);
        }

        Ok(CompletenessMetrics {
            sub_score: round2(sub_score),
            total_rows,
            column_completeness,
            mean_column_completeness: round2(mean_column_completeness),
            mean_row_coverage: round2(mean_row_coverage),
            rows_all_codes,
            rows_no_codes,
            rows_partial_codes,
            avg_codes_per_row: round2(codes_present_sum as f64 / total_rows as f64),
            flags,
        })
    }
}
