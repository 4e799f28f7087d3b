use super::metrics::Metric;
use super::validation::{ValidationOutcome, ValidationReport};
use super::variability::VariabilitySummary;

/// Renders the plain-text run summary.
///
/// Every metric is listed with its mean over codons, or `(Not available)`
/// when it was not requested or is undefined for every codon.
#[must_use]
pub fn generate_summary(variability: &VariabilitySummary, validation: &ValidationReport) -> String {
    let mut lines = vec!["### Simulation Summary ###".to_string(), String::new()];

    if variability.is_empty() {
        lines.push("No variability results available.".to_string());
    } else {
        lines.push("Variability Metrics (Mean Values):".to_string());
        for metric in Metric::ALL {
            lines.push(match variability.mean(metric) {
                Some(mean) => format!("- {metric}: {mean:.4}"),
                None => format!("- {metric}: (Not available)"),
            });
        }
    }

    lines.push(String::new());
    if validation.is_empty() {
        lines.push("No validation results available.".to_string());
    } else {
        lines.push("Validation Metrics:".to_string());
        for (metric, outcome) in validation.iter() {
            lines.push(match outcome {
                ValidationOutcome::Compared(c) => format!(
                    "- {metric}: correlation={:.4}, mean_squared_error={:.4}, simulated_mean={:.4}, experimental_mean={:.4}",
                    c.correlation, c.mean_squared_error, c.simulated_mean, c.experimental_mean
                ),
                ValidationOutcome::Skipped(reason) => format!("- {metric}: {reason}"),
            });
        }
    }

    lines.join("\n")
}
