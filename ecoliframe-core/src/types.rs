use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::constants::{CODON_ALPHABET, CODON_LENGTH, MAX_BASE_EFFICIENCY};

/// How a codon's translation efficiency responds to nutrient stress.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::types::RobustnessClass;
///
/// assert_eq!(RobustnessClass::Sensitive.to_string(), "sensitive");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobustnessClass {
    /// Efficiency follows the logistic response only
    Robust,
    /// Efficiency is additionally scaled by the nutrient level
    Sensitive,
}

impl fmt::Display for RobustnessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Robust => write!(f, "robust"),
            Self::Sensitive => write!(f, "sensitive"),
        }
    }
}

/// Static metadata of a tracked codon.
///
/// Created once by the initializer and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Codon {
    /// Three-letter codon token, e.g. `"AAA"`
    pub name: String,
    /// Response class
    pub class: RobustnessClass,
    /// Efficiency scale in `(0, 1.5]`
    pub base_efficiency: f64,
}

impl Codon {
    #[must_use]
    pub fn new(name: impl Into<String>, class: RobustnessClass, base_efficiency: f64) -> Self {
        Self {
            name: name.into(),
            class,
            base_efficiency,
        }
    }

    /// Whether the base efficiency is usable by the efficiency and decay models.
    #[must_use]
    pub fn has_valid_base_efficiency(&self) -> bool {
        self.base_efficiency.is_finite()
            && self.base_efficiency > 0.0
            && self.base_efficiency <= MAX_BASE_EFFICIENCY
    }
}

/// Checks that `token` is a codon: three upper-case letters from `ACGTU`.
///
/// # Errors
///
/// Returns [`EcoliFrameError::InvalidInput`] naming the offending token.
pub fn validate_codon_token(token: &str) -> Result<(), EcoliFrameError> {
    let bytes = token.as_bytes();
    if bytes.len() != CODON_LENGTH || !bytes.iter().all(|b| CODON_ALPHABET.contains(b)) {
        return Err(EcoliFrameError::InvalidInput(format!(
            "codon entry '{token}' is not a {CODON_LENGTH}-letter token over {}",
            String::from_utf8_lossy(CODON_ALPHABET)
        )));
    }
    Ok(())
}

/// Fixed mapping from codon identifier to efficiency slot.
///
/// Built once when a table is created; every [`CycleRecord`] stores its
/// efficiencies in this slot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodonIndex {
    names: Vec<String>,
    slots: HashMap<String, usize>,
}

impl CodonIndex {
    /// Builds the index from codon names in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::Schema`] if a name appears twice.
    pub fn new<I, S>(names: I) -> Result<Self, EcoliFrameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for name in names {
            let name = name.into();
            if index.slots.contains_key(&name) {
                return Err(EcoliFrameError::Schema(format!(
                    "codon '{name}' appears more than once"
                )));
            }
            index.slots.insert(name.clone(), index.names.len());
            index.names.push(name);
        }
        Ok(index)
    }

    #[must_use]
    pub fn slot(&self, codon: &str) -> Option<usize> {
        self.slots.get(codon).copied()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Serialize for CodonIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.names.serialize(serializer)
    }
}

/// Codon metadata produced alongside the initial table.
#[derive(Debug, Clone, PartialEq)]
pub struct CodonPanel {
    codons: Vec<Codon>,
    index: CodonIndex,
}

impl CodonPanel {
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::Schema`] on duplicate codon names.
    pub fn new(codons: Vec<Codon>) -> Result<Self, EcoliFrameError> {
        let index = CodonIndex::new(codons.iter().map(|codon| codon.name.clone()))?;
        Ok(Self { codons, index })
    }

    #[must_use]
    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    #[must_use]
    pub const fn index(&self) -> &CodonIndex {
        &self.index
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Codon> {
        self.index.slot(name).map(|slot| &self.codons[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Codon> {
        self.codons.iter()
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

/// Ordered set of nutrient levels, highest first.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::types::NutrientLevelSet;
///
/// let levels = NutrientLevelSet::new(vec![1.0, 0.5, 0.1])?;
/// assert_eq!(levels.highest(), 1.0);
/// assert_eq!(levels.lowest(), 0.1);
/// assert!(NutrientLevelSet::new(vec![0.1, 0.5]).is_err());
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientLevelSet {
    levels: Vec<f64>,
}

impl NutrientLevelSet {
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidInput`] if the set is empty, holds a
    /// non-finite or negative value, or is not strictly decreasing.
    pub fn new(levels: Vec<f64>) -> Result<Self, EcoliFrameError> {
        if levels.is_empty() {
            return Err(EcoliFrameError::InvalidInput(
                "nutrient_levels must be a non-empty list of numeric values".to_string(),
            ));
        }
        if let Some(bad) = levels.iter().find(|level| !level.is_finite()) {
            return Err(EcoliFrameError::InvalidInput(format!(
                "nutrient level {bad} is not a finite number"
            )));
        }
        if let Some(bad) = levels.iter().find(|&&level| level < 0.0) {
            return Err(EcoliFrameError::InvalidInput(format!(
                "nutrient level {bad} is negative"
            )));
        }
        if levels.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(EcoliFrameError::InvalidInput(format!(
                "nutrient_levels must be strictly decreasing, got {levels:?}"
            )));
        }
        Ok(Self { levels })
    }

    #[must_use]
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; construction rejects empty sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[must_use]
    pub fn highest(&self) -> f64 {
        self.levels[0]
    }

    #[must_use]
    pub fn lowest(&self) -> f64 {
        self.levels[self.levels.len() - 1]
    }

    /// Position of `level` in the set, compared exactly.
    #[must_use]
    pub fn position(&self, level: f64) -> Option<usize> {
        self.levels.iter().position(|&candidate| candidate == level)
    }

    #[must_use]
    pub fn contains(&self, level: f64) -> bool {
        self.position(level).is_some()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<f64> {
        self.levels.get(position).copied()
    }
}

/// One simulated cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleRecord {
    /// 1-based cycle index
    pub cycle: usize,
    /// Nutrient level in effect during the cycle
    pub nutrient_level: f64,
    /// Efficiency per codon slot; `None` marks a missing value
    pub efficiencies: Vec<Option<f64>>,
}

impl CycleRecord {
    #[must_use]
    pub fn unfilled(cycle: usize, nutrient_level: f64, codon_count: usize) -> Self {
        Self {
            cycle,
            nutrient_level,
            efficiencies: vec![None; codon_count],
        }
    }
}

/// Per-cycle simulation state: nutrient level and one efficiency per codon.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::types::{CycleRecord, SimulationTable};
///
/// let table = SimulationTable::new(
///     vec!["AAA".to_string()],
///     vec![CycleRecord { cycle: 1, nutrient_level: 1.0, efficiencies: vec![Some(0.8)] }],
/// )?;
/// assert_eq!(table.slot("AAA"), Some(0));
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationTable {
    codons: CodonIndex,
    /// Cycle records in cycle order
    pub rows: Vec<CycleRecord>,
}

impl SimulationTable {
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::Schema`] on duplicate codons or rows whose
    /// slot count differs from the codon count.
    pub fn new(codons: Vec<String>, rows: Vec<CycleRecord>) -> Result<Self, EcoliFrameError> {
        Self::with_index(CodonIndex::new(codons)?, rows)
    }

    /// # Errors
    ///
    /// Returns [`EcoliFrameError::Schema`] if a row does not match the index.
    pub fn with_index(codons: CodonIndex, rows: Vec<CycleRecord>) -> Result<Self, EcoliFrameError> {
        let table = Self { codons, rows };
        table.check_schema()?;
        Ok(table)
    }

    /// Builds a table from parallel nutrient and per-codon efficiency columns.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::Schema`] if a column length differs from the
    /// nutrient column.
    pub fn from_columns(
        nutrient_levels: &[f64],
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self, EcoliFrameError> {
        if let Some((name, column)) = columns
            .iter()
            .find(|(_, column)| column.len() != nutrient_levels.len())
        {
            return Err(EcoliFrameError::Schema(format!(
                "column '{name}' has {} values, expected {}",
                column.len(),
                nutrient_levels.len()
            )));
        }
        let rows = nutrient_levels
            .iter()
            .enumerate()
            .map(|(row, &nutrient_level)| CycleRecord {
                cycle: row + 1,
                nutrient_level,
                efficiencies: columns.iter().map(|(_, column)| column[row]).collect(),
            })
            .collect();
        Self::new(columns.into_iter().map(|(name, _)| name).collect(), rows)
    }

    /// Verifies every row has exactly one slot per indexed codon.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::Schema`] naming the first offending cycle.
    pub fn check_schema(&self) -> Result<(), EcoliFrameError> {
        match self
            .rows
            .iter()
            .find(|row| row.efficiencies.len() != self.codons.len())
        {
            Some(row) => Err(EcoliFrameError::Schema(format!(
                "cycle {} has {} efficiency slots, expected {}",
                row.cycle,
                row.efficiencies.len(),
                self.codons.len()
            ))),
            None => Ok(()),
        }
    }

    #[must_use]
    pub const fn codon_index(&self) -> &CodonIndex {
        &self.codons
    }

    #[must_use]
    pub fn codon_names(&self) -> &[String] {
        self.codons.names()
    }

    #[must_use]
    pub fn slot(&self, codon: &str) -> Option<usize> {
        self.codons.slot(codon)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Nutrient level of every cycle, in order.
    #[must_use]
    pub fn nutrient_levels(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.nutrient_level).collect()
    }

    /// Efficiency trace of one codon slot.
    pub fn efficiency_series(&self, slot: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.efficiencies.get(slot).copied().flatten())
    }
}

/// Error types that can occur while configuring, running or exporting a simulation
#[derive(Error, Debug)]
pub enum EcoliFrameError {
    /// Malformed configuration or input values
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A numeric parameter is outside its allowed range
    #[error("Invalid parameter: {name} {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
    /// None of the requested variability metrics is known
    #[error("Invalid metrics: metrics must be chosen from {valid}")]
    InvalidMetrics {
        /// The accepted metric names
        valid: String,
    },
    /// A stage that needs data received an empty table
    #[error("Empty dataset provided to {0}")]
    EmptyTable(&'static str),
    /// A codon listed in the metadata has no efficiency slot in the table
    #[error("Column '{0}' missing in simulation table")]
    MissingCodonColumn(String),
    /// Codon metadata lacks a usable base efficiency
    #[error("Missing or invalid 'base_efficiency' for codon: {0}")]
    InvalidCodonProfile(String),
    /// Table layout does not match its codon index
    #[error("Schema error: {0}")]
    Schema(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// JSON reading or writing failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl EcoliFrameError {
    /// Whether the error belongs to the schema/data-integrity family.
    #[must_use]
    pub const fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::MissingCodonColumn(_) | Self::InvalidCodonProfile(_) | Self::Schema(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codon_token_validation() {
        assert!(validate_codon_token("AAA").is_ok());
        assert!(validate_codon_token("GCU").is_ok());
        assert!(validate_codon_token("aaa").is_err());
        assert!(validate_codon_token("AAAA").is_err());
        assert!(validate_codon_token("").is_err());
        assert!(validate_codon_token("AXA").is_err());
    }

    #[test]
    fn test_codon_base_efficiency_bounds() {
        assert!(Codon::new("AAA", RobustnessClass::Robust, 1.0).has_valid_base_efficiency());
        assert!(Codon::new("AAA", RobustnessClass::Robust, 1.5).has_valid_base_efficiency());
        assert!(!Codon::new("AAA", RobustnessClass::Robust, 0.0).has_valid_base_efficiency());
        assert!(!Codon::new("AAA", RobustnessClass::Robust, 1.6).has_valid_base_efficiency());
        assert!(!Codon::new("AAA", RobustnessClass::Robust, f64::NAN).has_valid_base_efficiency());
    }

    #[test]
    fn test_codon_index_rejects_duplicates() {
        let err = CodonIndex::new(["AAA", "GAT", "AAA"]).unwrap_err();
        assert!(err.is_data_integrity());
        assert!(err.to_string().contains("AAA"));
    }

    #[test]
    fn test_codon_panel_lookup() {
        let panel = CodonPanel::new(vec![
            Codon::new("AAA", RobustnessClass::Robust, 1.0),
            Codon::new("CGT", RobustnessClass::Sensitive, 0.5),
        ])
        .unwrap();
        assert_eq!(panel.len(), 2);
        assert_eq!(panel.index().slot("CGT"), Some(1));
        assert_eq!(
            panel.get("CGT").map(|codon| codon.class),
            Some(RobustnessClass::Sensitive)
        );
        assert!(panel.get("TTT").is_none());
    }

    #[test]
    fn test_nutrient_level_set_validation() {
        assert!(NutrientLevelSet::new(vec![]).is_err());
        assert!(NutrientLevelSet::new(vec![1.0, 1.0]).is_err());
        assert!(NutrientLevelSet::new(vec![0.5, 1.0]).is_err());
        assert!(NutrientLevelSet::new(vec![1.0, f64::NAN]).is_err());
        let err = NutrientLevelSet::new(vec![0.0, -5.0]).unwrap_err();
        assert!(err.to_string().contains("negative"));
        assert!(NutrientLevelSet::new(vec![0.5, 0.0]).is_ok());

        let levels = NutrientLevelSet::new(vec![1.0, 0.75, 0.5]).unwrap();
        assert_eq!(levels.position(0.75), Some(1));
        assert!(!levels.contains(0.6));
        assert_eq!(levels.get(2), Some(0.5));
        assert_eq!(levels.get(3), None);
    }

    #[test]
    fn test_table_schema_mismatch() {
        let rows = vec![
            CycleRecord::unfilled(1, 1.0, 2),
            CycleRecord::unfilled(2, 1.0, 1),
        ];
        let err = SimulationTable::new(vec!["AAA".into(), "GAT".into()], rows).unwrap_err();
        assert!(matches!(err, EcoliFrameError::Schema(_)));
        assert!(err.to_string().contains("cycle 2"));
    }

    #[test]
    fn test_table_from_columns() {
        let table = SimulationTable::from_columns(
            &[1.0, 0.5],
            vec![
                ("AAA".to_string(), vec![Some(1.0), None]),
                ("GAT".to_string(), vec![Some(0.2), Some(0.3)]),
            ],
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].cycle, 2);
        assert_eq!(table.nutrient_levels(), vec![1.0, 0.5]);
        let aaa: Vec<_> = table.efficiency_series(0).collect();
        assert_eq!(aaa, vec![Some(1.0), None]);

        let err = SimulationTable::from_columns(&[1.0], vec![("AAA".to_string(), vec![])])
            .unwrap_err();
        assert!(matches!(err, EcoliFrameError::Schema(_)));
    }

    #[test]
    fn test_error_display_messages() {
        let err = EcoliFrameError::InvalidParameter {
            name: "stress_probability",
            reason: "must be between 0 and 1 (got -0.1)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter: stress_probability must be between 0 and 1 (got -0.1)"
        );
        assert_eq!(
            EcoliFrameError::MissingCodonColumn("AAA_efficiency".into()).to_string(),
            "Column 'AAA_efficiency' missing in simulation table"
        );
        assert!(!EcoliFrameError::EmptyTable("process_rna").is_data_integrity());
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        assert!(matches!(EcoliFrameError::from(io), EcoliFrameError::IoError(_)));

        let json = serde_json::from_str::<f64>("not json").unwrap_err();
        let err = EcoliFrameError::from(json);
        assert!(matches!(err, EcoliFrameError::JsonError(_)));
        assert!(err.to_string().starts_with("JSON error: "));

        assert_eq!(
            EcoliFrameError::ParseError("line 3".into()).to_string(),
            "Parse error: line 3"
        );
    }
}
