//! Code distribution analysis: cardinality, rarity, entropy, co-occurrence

use super::{normalized_entropy, round2};
use crate::catalog::{is_missing, Catalog};
use crate::config::CodeTuning;
use crate::error::AnalysisError;
use crate::Flag;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How many code columns participate in pairwise co-occurrence analysis
const CO_OCCURRENCE_COLUMNS: usize = 3;

/// A code value and its row count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Distribution statistics for one code column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeColumnDistribution {
    pub column: String,
    pub non_missing: usize,
    pub unique_codes: usize,
    pub most_common: Vec<ValueCount>,
    /// Values occurring below the rarity threshold (listing capped)
    pub rare_codes: Vec<ValueCount>,
    pub rare_code_count: usize,
    /// Rows holding a rare value / non-missing rows in this column
    pub rare_row_fraction: f64,
    /// Shannon entropy / log2(unique), in [0, 1]; 1.0 when unique <= 1
    pub normalized_entropy: f64,
    /// Share of all rows taken by the most common value, as a percentage
    pub top_code_concentration: f64,
}

/// Pairwise code combination statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoOccurrence {
    pub columns: (String, String),
    pub unique_combinations: usize,
    pub top_combinations: Vec<ValueCount>,
}

/// Metric result for the code distribution analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeDistributionMetrics {
    /// Sub-score (0-100): mean normalized entropy discounted by the
    /// rare-value row fraction
    pub sub_score: f64,
    pub columns: Vec<CodeColumnDistribution>,
    pub mean_normalized_entropy: f64,
    /// Rare cells across all code columns / non-missing cells
    pub rare_row_fraction: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub co_occurrence: Vec<CoOccurrence>,
    pub flags: Vec<Flag>,
}

pub struct CodeDistributionAnalyzer;

impl CodeDistributionAnalyzer {
    pub fn analyze(
        catalog: &Catalog,
        code_columns: &[String],
        tuning: &CodeTuning,
    ) -> Result<CodeDistributionMetrics, AnalysisError> {
        let total_rows = catalog.row_count();
        if total_rows == 0 {
            return Err(AnalysisError::InsufficientData(
                "catalog has no rows".to_string(),
            ));
        }
        let rare_cutoff = tuning.rare_threshold * total_rows as f64;

        let mut columns = Vec::new();
        let mut rare_cells = 0usize;
        let mut non_missing_cells = 0usize;
        for name in code_columns {
            let index = catalog.require_column(name)?;
            let counts = sorted_value_counts(catalog, index);
            let non_missing: usize = counts.iter().map(|v| v.count).sum();

            let rare: Vec<ValueCount> = counts
                .iter()
                .filter(|v| (v.count as f64) < rare_cutoff)
                .cloned()
                .collect();
            let rare_rows: usize = rare.iter().map(|v| v.count).sum();
            rare_cells += rare_rows;
            non_missing_cells += non_missing;

            let count_values: Vec<usize> = counts.iter().map(|v| v.count).collect();
            let entropy = normalized_entropy(&count_values);
            let top_concentration = counts
                .first()
                .map(|top| top.count as f64 / total_rows as f64 * 100.0)
                .unwrap_or(0.0);

            let rare_code_count = rare.len();
            let mut rare_listed = rare;
            rare_listed.truncate(tuning.max_rare_listed);

            columns.push(CodeColumnDistribution {
                column: name.clone(),
                non_missing,
                unique_codes: counts.len(),
                most_common: counts.into_iter().take(tuning.top_values).collect(),
                rare_codes: rare_listed,
                rare_code_count,
                rare_row_fraction: if non_missing > 0 {
                    round2(rare_rows as f64 / non_missing as f64)
                } else {
                    0.0
                },
                normalized_entropy: round4(entropy),
                top_code_concentration: round2(top_concentration),
            });
        }

        let mean_entropy =
            columns.iter().map(|c| c.normalized_entropy).sum::<f64>() / columns.len() as f64;
        let rare_row_fraction = if non_missing_cells > 0 {
            rare_cells as f64 / non_missing_cells as f64
        } else {
            0.0
        };

        let sub_score = (100.0
            * mean_entropy
            * (1.0 - tuning.rare_penalty_weight * rare_row_fraction))
            .clamp(0.0, 100.0);

        let co_occurrence = if tuning.co_occurrence && code_columns.len() >= 2 {
            Self::co_occurrence(catalog, code_columns, tuning)?
        } else {
            Vec::new()
        };

        let mut flags = Vec::new();
        if columns.iter().any(|c| c.rare_code_count > 0) {
            flags.push(Flag::RareCodes);
        }

        Ok(CodeDistributionMetrics {
            sub_score: round2(sub_score),
            columns,
            mean_normalized_entropy: round4(mean_entropy),
            rare_row_fraction: round4(rare_row_fraction),
            co_occurrence,
            flags,
        })
    }

    /// Pairwise combination counts over the first few code columns,
    /// bounded to avoid a combinatorial explosion on wide mappings.
    fn co_occurrence(
        catalog: &Catalog,
        code_columns: &[String],
        tuning: &CodeTuning,
    ) -> Result<Vec<CoOccurrence>, AnalysisError> {
        let head = &code_columns[..code_columns.len().min(CO_OCCURRENCE_COLUMNS)];
        let mut pairs = Vec::new();
        for (i, first) in head.iter().enumerate() {
            for second in &head[i + 1..] {
                let first_idx = catalog.require_column(first)?;
                let second_idx = catalog.require_column(second)?;

                let mut combos: HashMap<String, usize> = HashMap::new();
                for row in catalog.rows() {
                    let a = &row[first_idx];
                    let b = &row[second_idx];
                    if is_missing(a) || is_missing(b) {
                        continue;
                    }
                    *combos
                        .entry(format!("{}|{}", a.trim(), b.trim()))
                        .or_insert(0) += 1;
                }

                let unique_combinations = combos.len();
                let mut top: Vec<ValueCount> = combos
                    .into_iter()
                    .map(|(value, count)| ValueCount { value, count })
                    .collect();
                top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
                top.truncate(tuning.top_values);

                pairs.push(CoOccurrence {
                    columns: (first.clone(), second.clone()),
                    unique_combinations,
                    top_combinations: top,
                });
            }
        }
        Ok(pairs)
    }
}

/// Per-value counts for a column, most frequent first, ties broken by value
fn sorted_value_counts(catalog: &Catalog, index: usize) -> Vec<ValueCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for cell in catalog.column_values(index) {
        if !is_missing(cell) {
            *counts.entry(cell.trim()).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    counts
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
