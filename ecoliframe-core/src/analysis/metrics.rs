use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::EcoliFrameError;

/// Variability statistics available per codon.
///
/// Declaration order is the canonical column order of summaries and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Bessel-corrected sample variance
    #[serde(rename = "variance")]
    Variance,
    /// Variance-to-mean ratio
    #[serde(rename = "Fano_factor")]
    FanoFactor,
    /// Standard deviation over mean
    #[serde(rename = "CV")]
    Cv,
    /// Mean divided by range
    #[serde(rename = "CRI")]
    Cri,
}

impl Metric {
    pub const ALL: [Self; 4] = [Self::Variance, Self::FanoFactor, Self::Cv, Self::Cri];

    /// Column name used in tables and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Variance => "variance",
            Self::FanoFactor => "Fano_factor",
            Self::Cv => "CV",
            Self::Cri => "CRI",
        }
    }

    /// Exact-name lookup; names are case sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.name() == name)
    }

    fn valid_names() -> String {
        Self::ALL.map(Self::name).join(", ")
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-empty, ordered, duplicate-free selection of metrics.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::analysis::{Metric, MetricSet};
///
/// let metrics = MetricSet::from_names(["CV", "bogus", "variance"])?;
/// assert_eq!(metrics.as_slice(), &[Metric::Variance, Metric::Cv]);
/// assert!(MetricSet::from_names(["bogus"]).is_err());
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSet {
    metrics: Vec<Metric>,
}

impl MetricSet {
    /// Every metric in canonical order.
    #[must_use]
    pub fn all() -> Self {
        Self {
            metrics: Metric::ALL.to_vec(),
        }
    }

    /// Keeps the known names and drops the rest.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidMetrics`] listing the valid set when
    /// no requested name is known.
    pub fn from_names<I, S>(names: I) -> Result<Self, EcoliFrameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut metrics: Vec<Metric> = names
            .into_iter()
            .filter_map(|name| Metric::from_name(name.as_ref()))
            .collect();
        metrics.sort_unstable();
        metrics.dedup();
        if metrics.is_empty() {
            return Err(EcoliFrameError::InvalidMetrics {
                valid: Metric::valid_names(),
            });
        }
        Ok(Self { metrics })
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Metric] {
        &self.metrics
    }

    #[must_use]
    pub fn contains(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        self.metrics.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Default for MetricSet {
    fn default() -> Self {
        Self::all()
    }
}
