//! Console reporter with colored output

use crate::analyzer::scoring::CompositeScorer;
use crate::{flag_metric, CatalogReport, Finding, QualityLevel, Severity};
use colored::{ColoredString, Colorize};

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a full analysis
    pub fn report(&self, report: &CatalogReport) {
        self.print_header(report);
        self.print_score(report);
        self.print_breakdown(report);

        if !report.findings.is_empty() {
            self.print_findings(&report.findings);
        }

        self.print_recommendations(report);
        println!();
    }

    /// Report in quiet mode (just score and label)
    pub fn report_quiet(&self, report: &CatalogReport) {
        println!(
            "{} ({})",
            report.overall_score,
            self.colorize_level(report.label)
        );
    }

    fn print_header(&self, report: &CatalogReport) {
        println!();
        println!("{}", "Catalog Quality Analysis".bold());
        println!(
            "   Rows: {} | Columns: {} | Codes: {}",
            report.dataset.total_rows,
            report.dataset.total_columns,
            report.dataset.code_columns.join(", ")
        );
        println!(
            "   Id: {} | Description: {}",
            report.dataset.id_column, report.dataset.description_column
        );
        println!();
    }

    fn print_score(&self, report: &CatalogReport) {
        let bar = self.score_bar(report.overall_score);
        println!(
            "   Score: {} {:.2} {}",
            bar,
            report.overall_score,
            self.colorize_level(report.label).bold()
        );
        println!(
            "   {}",
            CompositeScorer::level_description(report.label).dimmed()
        );
        println!();
    }

    fn print_breakdown(&self, report: &CatalogReport) {
        println!("   {}", "Score Breakdown:".bold());
        let rows = [
            ("Completeness", report.completeness.sub_score),
            (
                "Description Quality",
                report.description_quality.sub_score,
            ),
            ("Code Distribution", report.code_distribution.sub_score),
            (
                "Classifier Readiness",
                report.classifier_readiness.sub_score,
            ),
        ];
        for (name, score) in rows {
            println!(
                "   {} {} {}",
                self.mini_bar(score),
                format!("{name:<22}"),
                self.colorize_score(score)
            );
        }
        println!();

        if self.verbose {
            self.print_detail(report);
        }
    }

    fn print_detail(&self, report: &CatalogReport) {
        println!("   {}", "Details:".bold());
        for column in &report.completeness.column_completeness {
            println!(
                "   - {}: {:.1}% complete ({} missing)",
                column.column, column.completeness_pct, column.missing
            );
        }
        let desc = &report.description_quality;
        println!(
            "   - descriptions: mean length {:.1}, richness {:.2}, duplicates {:.0}%",
            desc.length.mean,
            desc.vocabulary_richness,
            desc.duplicate_ratio * 100.0
        );
        for column in &report.code_distribution.columns {
            println!(
                "   - {}: {} codes, entropy {:.2}, {} rare",
                column.column,
                column.unique_codes,
                column.normalized_entropy,
                column.rare_code_count
            );
        }
        let ready = &report.classifier_readiness;
        println!(
            "   - readiness: {} classes, balance {:.2}, {}",
            ready.unique_classes, ready.class_balance, ready.split_recommendation
        );
        println!();
    }

    fn print_findings(&self, findings: &[Finding]) {
        println!("   {}", "Findings:".bold());
        for finding in findings {
            let marker = match finding.severity {
                Severity::Error => self.paint("error", |s| s.red().bold()),
                Severity::Warning => self.paint("warning", |s| s.yellow()),
                Severity::Info => self.paint("info", |s| s.blue()),
            };
            println!(
                "   [{}] {} ({})",
                marker,
                finding.message,
                flag_metric(&finding.flag).dimmed()
            );
        }
        println!();
    }

    fn print_recommendations(&self, report: &CatalogReport) {
        println!("   {}", "Recommendations:".bold());
        for recommendation in &report.recommendations {
            println!("   - {recommendation}");
        }
    }

    fn score_bar(&self, score: f64) -> String {
        let filled = (score / 10.0).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled.min(10)));
        if !self.use_colors {
            return bar;
        }
        let colored = if score >= 75.0 {
            bar.green()
        } else if score >= 50.0 {
            bar.yellow()
        } else {
            bar.red()
        };
        colored.to_string()
    }

    fn mini_bar(&self, score: f64) -> String {
        let filled = ((score / 20.0).round() as usize).min(5);
        format!("{}{}", "▰".repeat(filled), "▱".repeat(5 - filled))
    }

    // Pad before styling: width specs applied to a ColoredString count
    // escape codes and truncate the rendered text.
    fn colorize_score(&self, score: f64) -> ColoredString {
        let text = format!("{score:>6.2}");
        if !self.use_colors {
            return text.normal();
        }
        if score >= 75.0 {
            text.green()
        } else if score >= 50.0 {
            text.yellow()
        } else {
            text.red()
        }
    }

    fn colorize_level(&self, level: QualityLevel) -> ColoredString {
        let text = level.to_string();
        if !self.use_colors {
            return text.normal();
        }
        match level {
            QualityLevel::Excellent | QualityLevel::Good => text.green(),
            QualityLevel::Fair => text.yellow(),
            QualityLevel::Poor => text.yellow(),
            QualityLevel::Critical => text.red(),
        }
    }

    fn paint(&self, text: &str, style: impl Fn(ColoredString) -> ColoredString) -> ColoredString {
        if self.use_colors {
            style(text.normal())
        } else {
            text.normal()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
