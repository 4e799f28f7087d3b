use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use super::metrics::{Metric, MetricSet};
use super::variability::VariabilitySummary;
use crate::types::EcoliFrameError;

/// Experimental benchmark values keyed by codon, one column per metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    codons: Vec<String>,
    rows: HashMap<String, usize>,
    columns: BTreeMap<Metric, Vec<Option<f64>>>,
}

impl ReferenceTable {
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::Schema`] if a codon is listed twice.
    pub fn new<I, S>(codons: I) -> Result<Self, EcoliFrameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for codon in codons {
            let codon = codon.into();
            if table.rows.contains_key(&codon) {
                return Err(EcoliFrameError::Schema(format!(
                    "reference codon '{codon}' appears more than once"
                )));
            }
            table.rows.insert(codon.clone(), table.codons.len());
            table.codons.push(codon);
        }
        Ok(table)
    }

    /// Adds or replaces the column of `metric`.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::Schema`] if `values` does not have one entry
    /// per codon.
    pub fn with_column(mut self, metric: Metric, values: Vec<Option<f64>>) -> Result<Self, EcoliFrameError> {
        if values.len() != self.codons.len() {
            return Err(EcoliFrameError::Schema(format!(
                "reference column '{metric}' has {} values, expected {}",
                values.len(),
                self.codons.len()
            )));
        }
        self.columns.insert(metric, values);
        Ok(self)
    }

    /// Published benchmark variability for the default codon panel.
    #[must_use]
    pub fn builtin_benchmarks() -> Self {
        let codons = ["AAA", "GAT", "CGT", "CTG"];
        let column = |values: [f64; 4]| values.map(Some).to_vec();
        let mut table = Self {
            codons: codons.map(String::from).to_vec(),
            rows: codons
                .iter()
                .enumerate()
                .map(|(row, codon)| ((*codon).to_string(), row))
                .collect(),
            columns: BTreeMap::new(),
        };
        table.columns.insert(Metric::Variance, column([0.0026, 0.0031, 0.0079, 0.0098]));
        table.columns.insert(Metric::FanoFactor, column([0.26, 0.31, 0.79, 0.98]));
        table.columns.insert(Metric::Cv, column([0.051, 0.061, 0.119, 0.141]));
        table.columns.insert(Metric::Cri, column([4.1, 3.9, 1.6, 1.3]));
        table
    }

    #[must_use]
    pub fn codons(&self) -> &[String] {
        &self.codons
    }

    #[must_use]
    pub fn has_metric(&self, metric: Metric) -> bool {
        self.columns.contains_key(&metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.columns.keys().copied()
    }

    /// Reference value; the outer `None` means the codon or metric is absent.
    #[must_use]
    pub fn value(&self, codon: &str, metric: Metric) -> Option<Option<f64>> {
        let row = *self.rows.get(codon)?;
        self.columns.get(&metric).map(|column| column[row])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }
}

/// Agreement between simulated and reference values of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricComparison {
    /// Pearson correlation coefficient
    pub correlation: f64,
    pub mean_squared_error: f64,
    pub simulated_mean: f64,
    pub experimental_mean: f64,
}

/// Why a metric could not be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MetricMissing,
    InsufficientData,
    ConstantInput,
    AllUndefined,
}

impl SkipReason {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MetricMissing => "Metric missing in simulation or experimental data.",
            Self::InsufficientData => "Not enough data points for correlation.",
            Self::ConstantInput => "Constant input detected.",
            Self::AllUndefined => "NaN values detected in all entries.",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Result of validating one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValidationOutcome {
    Compared(MetricComparison),
    Skipped(SkipReason),
}

impl ValidationOutcome {
    #[must_use]
    pub const fn comparison(&self) -> Option<&MetricComparison> {
        match self {
            Self::Compared(comparison) => Some(comparison),
            Self::Skipped(_) => None,
        }
    }

    #[must_use]
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Compared(_) => None,
            Self::Skipped(reason) => Some(*reason),
        }
    }
}

/// Validation outcome per requested metric, in canonical metric order.
///
/// Serializes as a JSON object keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    outcomes: BTreeMap<Metric, ValidationOutcome>,
}

impl ValidationReport {
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<&ValidationOutcome> {
        self.outcomes.get(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &ValidationOutcome)> {
        self.outcomes.iter().map(|(metric, outcome)| (*metric, outcome))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of metrics that produced a comparison.
    #[must_use]
    pub fn compared_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|outcome| outcome.comparison().is_some())
            .count()
    }
}

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&value| value == values[0])
}

/// Deviations from the mean, scaled by the largest one so that squaring
/// neither underflows nor overflows.
fn scaled_deviations(values: &[f64]) -> Vec<f64> {
    let center = mean(values);
    let deviations: Vec<f64> = values.iter().map(|value| value - center).collect();
    let scale = deviations.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
    if scale > 0.0 {
        deviations.into_iter().map(|d| d / scale).collect()
    } else {
        deviations
    }
}

/// `None` when either side has no spread.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let (dx, dy) = (scaled_deviations(xs), scaled_deviations(ys));
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in dx.iter().zip(&dy) {
        cov += x * y;
        vx += x * x;
        vy += y * y;
    }
    let correlation = cov / (vx.sqrt() * vy.sqrt());
    correlation.is_finite().then(|| correlation.clamp(-1.0, 1.0))
}

fn compare_metric(
    summary: &VariabilitySummary,
    reference: &ReferenceTable,
    metric: Metric,
) -> ValidationOutcome {
    let (Some(column), true) = (summary.column(metric), reference.has_metric(metric)) else {
        return ValidationOutcome::Skipped(SkipReason::MetricMissing);
    };

    let aligned: Vec<(Option<f64>, Option<f64>)> = column
        .into_iter()
        .filter_map(|(codon, simulated)| {
            reference
                .value(codon, metric)
                .map(|experimental| (defined(simulated), defined(experimental)))
        })
        .collect();
    if aligned.len() < 2 {
        return ValidationOutcome::Skipped(SkipReason::InsufficientData);
    }
    if aligned.iter().all(|(simulated, _)| simulated.is_none())
        || aligned.iter().all(|(_, experimental)| experimental.is_none())
    {
        return ValidationOutcome::Skipped(SkipReason::AllUndefined);
    }

    let (simulated, experimental): (Vec<f64>, Vec<f64>) = aligned
        .into_iter()
        .filter_map(|pair| match pair {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        })
        .unzip();
    if simulated.len() < 2 {
        return ValidationOutcome::Skipped(SkipReason::InsufficientData);
    }
    if is_constant(&simulated) || is_constant(&experimental) {
        return ValidationOutcome::Skipped(SkipReason::ConstantInput);
    }
    let Some(correlation) = pearson(&simulated, &experimental) else {
        return ValidationOutcome::Skipped(SkipReason::ConstantInput);
    };

    let mean_squared_error = simulated
        .iter()
        .zip(&experimental)
        .map(|(s, e)| (e - s).powi(2))
        .sum::<f64>()
        / simulated.len() as f64;
    ValidationOutcome::Compared(MetricComparison {
        correlation,
        mean_squared_error,
        simulated_mean: mean(&simulated),
        experimental_mean: mean(&experimental),
    })
}

/// Compares simulated variability against reference benchmarks.
///
/// Rows are matched by codon; codons missing from the reference are left out.
/// Degenerate cases become [`ValidationOutcome::Skipped`] entries and never
/// stop the other metrics from being compared.
#[must_use]
pub fn validate_simulation(
    summary: &VariabilitySummary,
    reference: &ReferenceTable,
    metrics: &MetricSet,
) -> ValidationReport {
    let outcomes = metrics
        .iter()
        .map(|metric| {
            let outcome = compare_metric(summary, reference, metric);
            match &outcome {
                ValidationOutcome::Skipped(reason) => {
                    warn!(metric = %metric, "Skipping validation: {reason}");
                }
                ValidationOutcome::Compared(comparison) => {
                    debug!(
                        metric = %metric,
                        correlation = comparison.correlation,
                        mse = comparison.mean_squared_error,
                        "Validated metric"
                    );
                }
            }
            (metric, outcome)
        })
        .collect();
    ValidationReport { outcomes }
}
