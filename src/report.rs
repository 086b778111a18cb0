//! Console report rendering
//!
//! Formats one analysis run as the human-readable report: ingestion audit,
//! aggregate condition-level stats, paired t-test results, and the max/min
//! outlier summary. Rendering builds a string so tests can assert on it;
//! `main` decides where it goes.

use crate::analysis::{AnalysisReport, PairedTestOutcome};
use crate::ingest::Ingestion;
use std::fmt::Write;

/// Render the full text report.
pub fn render(ingestion: &Ingestion, report: &AnalysisReport) -> String {
    let mut out = String::new();

    render_ingestion(&mut out, ingestion, report);
    render_population(&mut out, report);
    render_t_tests(&mut out, report);
    render_min_max(&mut out, report);

    out
}

fn render_ingestion(out: &mut String, ingestion: &Ingestion, report: &AnalysisReport) {
    let _ = writeln!(
        out,
        "Ingested {} trials from {} source(s)",
        report.total_trials, ingestion.valid_sources
    );
    for skipped in &ingestion.skipped {
        let _ = writeln!(out, "  skipped {}: {}", skipped.file, skipped.reason);
    }
    if report.unknown_trials > 0 {
        let _ = writeln!(
            out,
            "  WARNING: {} trial(s) with no target tag in either slot (counted as Unknown)",
            report.unknown_trials
        );
    }
    for group in &report.degenerate_groups {
        let _ = writeln!(
            out,
            "  WARNING: no {} trials for {}; group excluded from SDT metrics",
            group.trial_type, group.group
        );
    }
}

fn render_population(out: &mut String, report: &AnalysisReport) {
    let _ = writeln!(out, "\nAggregate Condition-Level Stats:");
    for summary in &report.population {
        let _ = writeln!(out, "\n{} Condition ({} trials):", capitalize(&summary.condition.to_string()), summary.trials);
        let _ = writeln!(
            out,
            "  Overall Proportion Correct (Hit Rate): {:.4}",
            summary.overall_accuracy
        );
        let _ = writeln!(out, "  False Alarm: {:.4}", summary.error_rate);
        let _ = writeln!(out, "  P(C|SN): {:.4}   P(C|NS): {:.4}", summary.p_sn, summary.p_ns);
        let _ = writeln!(out, "  D-prime (FC): {:.4}", summary.metrics.d_prime);
        let _ = writeln!(out, "  Lambda (FC): {:.4}", summary.metrics.lambda);
        let _ = writeln!(out, "  Log Beta (FC): {:.4}", summary.metrics.log_beta);
    }
}

fn render_t_tests(out: &mut String, report: &AnalysisReport) {
    let _ = writeln!(out, "\nPaired T-Test Results:");
    render_test(out, "D-prime", &report.d_prime_test);
    render_test(out, "Lambda", &report.lambda_test);
}

fn render_test(out: &mut String, label: &str, outcome: &PairedTestOutcome) {
    match outcome {
        PairedTestOutcome::Computed(test) => {
            let _ = writeln!(
                out,
                "  {} T-test: t-statistic = {:.4}, p-value = {:.4} ({} pairs, df = {})",
                label, test.statistic, test.pvalue, test.pairs, test.df
            );
        }
        PairedTestOutcome::InsufficientData { pairs } => {
            let _ = writeln!(
                out,
                "  {} T-test: insufficient data ({} matched pair(s), need 2)",
                label, pairs
            );
        }
    }
}

fn render_min_max(out: &mut String, report: &AnalysisReport) {
    let _ = writeln!(out, "\nSummary of Maximum and Minimum Values:");
    for diag in &report.diagnostics {
        let condition = capitalize(&diag.condition.to_string());
        match diag.d_prime {
            Some(range) => {
                let _ = writeln!(out, "  Max d' ({} Condition): {:.4}", condition, range.max);
                let _ = writeln!(out, "  Min d' ({} Condition): {:.4}", condition, range.min);
            }
            None => {
                let _ = writeln!(out, "  d' ({} Condition): No data", condition);
            }
        }
        match diag.proportion_correct {
            Some(range) => {
                let _ = writeln!(
                    out,
                    "  Max Proportion Correct ({} Condition): {:.4}",
                    condition, range.max
                );
                let _ = writeln!(
                    out,
                    "  Min Proportion Correct ({} Condition): {:.4}",
                    condition, range.min
                );
            }
            None => {
                let _ = writeln!(out, "  Proportion Correct ({} Condition): No data", condition);
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
