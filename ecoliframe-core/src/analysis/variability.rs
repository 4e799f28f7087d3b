use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tracing::debug;

use super::metrics::{Metric, MetricSet};
use crate::constants::CODON_COLUMN;
use crate::types::{EcoliFrameError, SimulationTable};

/// Variability statistics of one codon, aligned with the summary's metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CodonVariability {
    pub codon: String,
    /// One entry per requested metric; `None` where the statistic is undefined
    pub values: Vec<Option<f64>>,
}

/// Per-codon variability statistics for a set of requested metrics.
///
/// Serializes as a list of records keyed by column name, `codon` first.
#[derive(Debug, Clone, PartialEq)]
pub struct VariabilitySummary {
    metrics: MetricSet,
    pub rows: Vec<CodonVariability>,
}

impl VariabilitySummary {
    /// Summary with the given columns and no rows.
    #[must_use]
    pub const fn empty(metrics: MetricSet) -> Self {
        Self {
            metrics,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub const fn metrics(&self) -> &MetricSet {
        &self.metrics
    }

    /// `["codon", <metrics in canonical order>...]`
    #[must_use]
    pub fn column_names(&self) -> Vec<&'static str> {
        std::iter::once(CODON_COLUMN)
            .chain(self.metrics.iter().map(Metric::name))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `metric` for `codon`; `None` if either is absent or the value
    /// is undefined.
    #[must_use]
    pub fn get(&self, codon: &str, metric: Metric) -> Option<f64> {
        let column = self.metric_position(metric)?;
        self.rows
            .iter()
            .find(|row| row.codon == codon)
            .and_then(|row| row.values[column])
    }

    /// Column of `metric` paired with its codon, in row order.
    #[must_use]
    pub fn column(&self, metric: Metric) -> Option<Vec<(&str, Option<f64>)>> {
        let column = self.metric_position(metric)?;
        Some(
            self.rows
                .iter()
                .map(|row| (row.codon.as_str(), row.values[column]))
                .collect(),
        )
    }

    /// Mean of the defined values of `metric` across codons.
    #[must_use]
    pub fn mean(&self, metric: Metric) -> Option<f64> {
        let values: Vec<f64> = self
            .column(metric)?
            .into_iter()
            .filter_map(|(_, value)| value)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    fn metric_position(&self, metric: Metric) -> Option<usize> {
        self.metrics.iter().position(|candidate| candidate == metric)
    }
}

struct RecordRef<'a> {
    metrics: &'a MetricSet,
    row: &'a CodonVariability,
}

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len() + 1))?;
        map.serialize_entry(CODON_COLUMN, &self.row.codon)?;
        for (metric, value) in self.metrics.iter().zip(&self.row.values) {
            map.serialize_entry(metric.name(), value)?;
        }
        map.end()
    }
}

impl Serialize for VariabilitySummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RecordRef {
                metrics: &self.metrics,
                row,
            })?;
        }
        seq.end()
    }
}

/// Descriptive statistics of a non-empty series.
#[derive(Debug, Clone, Copy)]
struct SeriesStats {
    mean: f64,
    variance: Option<f64>,
    min: f64,
    max: f64,
}

impl SeriesStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = (values.len() > 1).then(|| {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
        });
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            mean,
            variance,
            min,
            max,
        })
    }

    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Variance => self.variance,
            Metric::FanoFactor => self
                .variance
                .filter(|_| self.mean > 0.0)
                .map(|variance| variance / self.mean),
            Metric::Cv => self
                .variance
                .filter(|_| self.mean > 0.0)
                .map(|variance| variance.sqrt() / self.mean),
            Metric::Cri => (self.max > self.min).then(|| self.mean / (self.max - self.min)),
        }
    }
}

/// Reduces each codon's efficiency trace to the requested statistics.
///
/// Unknown metric names are ignored.
///
/// # Errors
///
/// Returns [`EcoliFrameError::InvalidMetrics`] if none of `metrics` is known.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::analysis::{Metric, analyze_variability};
/// use ecoliframe_core::types::SimulationTable;
///
/// let efficiencies = vec![Some(0.1), Some(0.9), Some(0.2), Some(0.8)];
/// let table = SimulationTable::from_columns(&[1.0; 4], vec![("AAA".to_string(), efficiencies)])?;
/// let summary = analyze_variability(&table, ["variance", "CV"])?;
/// assert_eq!(summary.column_names(), vec!["codon", "variance", "CV"]);
/// assert!(summary.get("AAA", Metric::Cv).unwrap() > 0.0);
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
pub fn analyze_variability<I, S>(
    table: &SimulationTable,
    metrics: I,
) -> Result<VariabilitySummary, EcoliFrameError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let metrics = MetricSet::from_names(metrics)?;
    Ok(summarize(table, &metrics))
}

/// [`analyze_variability`] for an already validated metric set.
#[must_use]
pub fn summarize(table: &SimulationTable, metrics: &MetricSet) -> VariabilitySummary {
    if table.is_empty() || table.codon_index().is_empty() {
        return VariabilitySummary::empty(metrics.clone());
    }

    let rows = table
        .codon_names()
        .iter()
        .enumerate()
        .map(|(slot, codon)| {
            let values: Vec<f64> = table
                .efficiency_series(slot)
                .flatten()
                .filter(|value| !value.is_nan())
                .collect();
            let stats = SeriesStats::from_values(&values);
            debug!(codon = %codon, points = values.len(), "Summarized efficiency trace");
            CodonVariability {
                codon: codon.clone(),
                values: metrics
                    .iter()
                    .map(|metric| stats.and_then(|stats| stats.metric(metric)))
                    .collect(),
            }
        })
        .collect();

    VariabilitySummary {
        metrics: metrics.clone(),
        rows,
    }
}
