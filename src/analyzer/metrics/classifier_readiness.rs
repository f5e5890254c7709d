//! Classifier readiness: is the labeled data adequate for training?
//!
//! The classification target is the primary (first) code column; a row is
//! usable when both its description and its target code are present.

use super::{normalized_entropy, round2};
use crate::catalog::{is_missing, Catalog};
use crate::config::ReadinessTuning;
use crate::error::AnalysisError;
use crate::Flag;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One class and its sample count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSample {
    pub code: String,
    pub count: usize,
}

/// Metric result for the classifier readiness analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierReadinessMetrics {
    /// Sub-score (0-100): blend of sample sufficiency and class balance;
    /// 0 when fewer than two distinct classes exist
    pub sub_score: f64,
    pub target_column: String,
    /// Rows with both a description and a target code
    pub valid_rows: usize,
    pub unique_classes: usize,
    /// Samples per class, largest first
    pub class_sizes: Vec<ClassSample>,
    pub classes_with_sufficient_data: usize,
    pub classes_needing_more_data: usize,
    pub min_class_size: usize,
    pub max_class_size: usize,
    pub median_class_size: f64,
    /// Normalized entropy of class sizes, same definition as the code
    /// distribution analyzer
    pub class_balance: f64,
    /// Largest class size / smallest class size
    pub imbalance_ratio: f64,
    /// Row share of classes below the minimum sample count
    pub deficient_row_share: f64,
    /// Distinct descriptions mapped to more than one target code
    pub ambiguous_descriptions: usize,
    /// Ambiguous descriptions / distinct descriptions
    pub ambiguous_rate: f64,
    pub split_recommendation: String,
    pub flags: Vec<Flag>,
}

pub struct ClassifierReadinessAnalyzer;

impl ClassifierReadinessAnalyzer {
    pub fn analyze(
        catalog: &Catalog,
        description_column: &str,
        target_column: &str,
        tuning: &ReadinessTuning,
    ) -> Result<ClassifierReadinessMetrics, AnalysisError> {
        let desc_idx = catalog.require_column(description_column)?;
        let target_idx = catalog.require_column(target_column)?;

        let mut class_counts: HashMap<&str, usize> = HashMap::new();
        let mut codes_per_description: HashMap<&str, HashSet<&str>> = HashMap::new();
        let mut valid_rows = 0usize;
        for row in catalog.rows() {
            let description = row[desc_idx].trim();
            let code = row[target_idx].trim();
            if is_missing(description) || is_missing(code) {
                continue;
            }
            valid_rows += 1;
            *class_counts.entry(code).or_insert(0) += 1;
            codes_per_description
                .entry(description)
                .or_default()
                .insert(code);
        }

        if valid_rows == 0 {
            return Err(AnalysisError::InsufficientData(format!(
                "no rows with both {description_column} and {target_column} present"
            )));
        }

        let mut class_sizes: Vec<ClassSample> = class_counts
            .into_iter()
            .map(|(code, count)| ClassSample {
                code: code.to_string(),
                count,
            })
            .collect();
        class_sizes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));

        let unique_classes = class_sizes.len();
        let counts: Vec<usize> = class_sizes.iter().map(|c| c.count).collect();
        let max_class_size = counts.first().copied().unwrap_or(0);
        let min_class_size = counts.last().copied().unwrap_or(0);
        let median_class_size = {
            let mut sorted: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
            sorted.sort_by(|a, b| a.total_cmp(b));
            super::median_sorted(&sorted)
        };

        let classes_with_sufficient_data =
            counts.iter().filter(|&&c| c >= tuning.min_samples).count();
        let classes_needing_more_data = unique_classes - classes_with_sufficient_data;
        let deficient_rows: usize = counts.iter().filter(|&&c| c < tuning.min_samples).sum();
        let deficient_row_share = deficient_rows as f64 / valid_rows as f64;

        let class_balance = normalized_entropy(&counts);
        let imbalance_ratio = if min_class_size > 0 {
            max_class_size as f64 / min_class_size as f64
        } else {
            0.0
        };

        let distinct_descriptions = codes_per_description.len();
        let ambiguous_descriptions = codes_per_description
            .values()
            .filter(|codes| codes.len() > 1)
            .count();
        let ambiguous_rate = ambiguous_descriptions as f64 / distinct_descriptions as f64;

        let mut flags = Vec::new();
        let sub_score = if unique_classes < 2 {
            flags.push(Flag::InsufficientClasses);
            0.0
        } else {
            let sufficiency = 1.0 - deficient_row_share;
            (100.0 * (tuning.sufficiency_weight * sufficiency
                + tuning.balance_weight * class_balance))
                .clamp(0.0, 100.0)
        };
        if classes_needing_more_data > 0 && unique_classes >= 2 {
            flags.push(Flag::SparseClasses);
        }
        if imbalance_ratio > tuning.imbalance_warn_ratio {
            flags.push(Flag::ClassImbalance);
        }
        if ambiguous_descriptions > 0 {
            flags.push(Flag::AmbiguousDescriptions);
        }

        Ok(ClassifierReadinessMetrics {
            sub_score: round2(sub_score),
            target_column: target_column.to_string(),
            valid_rows,
            unique_classes,
            class_sizes,
            classes_with_sufficient_data,
            classes_needing_more_data,
            min_class_size,
            max_class_size,
            median_class_size: round2(median_class_size),
            class_balance: round2(class_balance),
            imbalance_ratio: round2(imbalance_ratio),
            deficient_row_share: round2(deficient_row_share),
            ambiguous_descriptions,
            ambiguous_rate: round2(ambiguous_rate),
            split_recommendation: split_recommendation(min_class_size, tuning.min_samples),
            flags,
        })
    }
}

/// Recommend a train/test split based on the smallest class size
fn split_recommendation(smallest_class: usize, min_samples: usize) -> String {
    if smallest_class < min_samples {
        "Insufficient data - collect more samples".to_string()
    } else if smallest_class < min_samples * 2 {
        "90/10 split (limited data)".to_string()
    } else if smallest_class < min_samples * 3 {
        "80/20 split (recommended)".to_string()
    } else {
        "70/30 or 80/20 split".to_string()
    }
}
