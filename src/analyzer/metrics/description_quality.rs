//! Description text-quality heuristics: length, vocabulary, duplication

use super::{median_sorted, round2, sample_stdev};
use crate::catalog::{is_missing, Catalog};
use crate::config::DescriptionTuning;
use crate::error::AnalysisError;
use crate::Flag;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Character-length distribution over non-missing descriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
    pub stdev: f64,
}

/// A repeated description value and how many rows carry it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateValue {
    pub value: String,
    pub count: usize,
}

/// Metric result for the description quality analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionQualityMetrics {
    /// Sub-score (0-100): 100 minus capped penalties for short, duplicate
    /// and noisy descriptions, adjusted by vocabulary richness
    pub sub_score: f64,
    /// Non-missing descriptions analyzed
    pub analyzed: usize,
    pub length: LengthStats,
    pub unique_tokens: usize,
    pub total_tokens: usize,
    /// unique tokens / total tokens across all descriptions
    pub vocabulary_richness: f64,
    /// Rows whose description occurs more than once / analyzed rows
    pub duplicate_ratio: f64,
    /// Distinct description values that repeat
    pub distinct_duplicates: usize,
    pub top_duplicates: Vec<DuplicateValue>,
    pub too_short: usize,
    pub mostly_numeric: usize,
    pub special_characters: usize,
    pub flags: Vec<Flag>,
}

pub struct DescriptionQualityAnalyzer;

impl DescriptionQualityAnalyzer {
    pub fn analyze(
        catalog: &Catalog,
        description_column: &str,
        tuning: &DescriptionTuning,
    ) -> Result<DescriptionQualityMetrics, AnalysisError> {
        let index = catalog.require_column(description_column)?;
        let descriptions: Vec<&str> = catalog
            .column_values(index)
            .filter(|c| !is_missing(c))
            .map(str::trim)
            .collect();
        if descriptions.is_empty() {
            return Err(AnalysisError::EmptyColumn {
                column: description_column.to_string(),
            });
        }
        let analyzed = descriptions.len();

        // Length distribution (character counts)
        let lengths: Vec<f64> = descriptions
            .iter()
            .map(|d| d.chars().count() as f64)
            .collect();
        let mean = lengths.iter().sum::<f64>() / analyzed as f64;
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let length = LengthStats {
            min: sorted[0] as usize,
            max: sorted[analyzed - 1] as usize,
            mean: round2(mean),
            median: round2(median_sorted(&sorted)),
            stdev: round2(sample_stdev(&lengths, mean)),
        };

        // Vocabulary richness over lowercased whitespace tokens
        let mut unique_tokens = HashSet::new();
        let mut total_tokens = 0usize;
        for description in &descriptions {
            for token in description.split_whitespace() {
                total_tokens += 1;
                unique_tokens.insert(token.to_lowercase());
            }
        }
        let unique_tokens = unique_tokens.len();
        let vocabulary_richness = if total_tokens > 0 {
            unique_tokens as f64 / total_tokens as f64
        } else {
            0.0
        };

        // Duplicate descriptions
        let mut value_counts: HashMap<&str, usize> = HashMap::new();
        for description in &descriptions {
            *value_counts.entry(description).or_insert(0) += 1;
        }
        let duplicate_rows: usize = value_counts.values().filter(|&&c| c > 1).sum();
        let distinct_duplicates = value_counts.values().filter(|&&c| c > 1).count();
        let duplicate_ratio = duplicate_rows as f64 / analyzed as f64;

        let mut repeated: Vec<DuplicateValue> = value_counts
            .iter()
            .filter(|(_, &count)| count > 1)
            .map(|(value, &count)| DuplicateValue {
                value: value.to_string(),
                count,
            })
            .collect();
        repeated.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        repeated.truncate(tuning.top_duplicates);

        // Per-description quality flags
        let mut too_short = 0usize;
        let mut mostly_numeric = 0usize;
        let mut special_characters = 0usize;
        for description in &descriptions {
            let chars = description.chars().count();
            if chars < tuning.min_length {
                too_short += 1;
            }
            let digits = description.chars().filter(|c| c.is_ascii_digit()).count();
            if digits as f64 / chars as f64 >= tuning.mostly_numeric_ratio {
                mostly_numeric += 1;
            }
            let special = description
                .chars()
                .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
                .count();
            if special as f64 / chars as f64 > tuning.special_char_ratio {
                special_characters += 1;
            }
        }

        let mut flags = Vec::new();
        if too_short > 0 {
            flags.push(Flag::TooShort);
        }
        if mostly_numeric > 0 {
            flags.push(Flag::MostlyNumeric);
        }
        if special_characters > 0 {
            flags.push(Flag::SpecialCharacters);
        }

        let sub_score = Self::score(
            analyzed,
            too_short,
            mostly_numeric,
            special_characters,
            duplicate_ratio,
            vocabulary_richness,
            tuning,
        );

        Ok(DescriptionQualityMetrics {
            sub_score,
            analyzed,
            length,
            unique_tokens,
            total_tokens,
            vocabulary_richness: round2(vocabulary_richness),
            duplicate_ratio: round2(duplicate_ratio),
            distinct_duplicates,
            top_duplicates: repeated,
            too_short,
            mostly_numeric,
            special_characters,
            flags,
        })
    }

    /// Penalty function: each incidence rate costs up to its configured
    /// cap, and vocabulary richness shifts the result around its baseline.
    fn score(
        analyzed: usize,
        too_short: usize,
        mostly_numeric: usize,
        special_characters: usize,
        duplicate_ratio: f64,
        richness: f64,
        tuning: &DescriptionTuning,
    ) -> f64 {
        let rate = |count: usize| count as f64 / analyzed as f64 * 100.0;
        let mut score = 100.0;
        score -= rate(too_short).min(tuning.short_penalty_cap);
        score -= (duplicate_ratio * 100.0).min(tuning.duplicate_penalty_cap);
        score -= rate(mostly_numeric).min(tuning.numeric_penalty_cap);
        score -= rate(special_characters).min(tuning.special_penalty_cap);
        score += (richness - tuning.richness_baseline) * tuning.richness_weight;
        round2(score.clamp(0.0, 100.0))
    }
}
