use serde::Deserialize;

use crate::analysis::MetricSet;
use crate::constants::*;
use crate::simulation::initialization::{BaseEfficiencies, validate_codon_lists};
use crate::types::{EcoliFrameError, NutrientLevelSet};

/// Output format for tabular artifacts (variability summary, simulation table).
///
/// The validation report is always written as JSON and the run summary as
/// plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Pretty-printed JSON records.
    Json,
}

impl OutputFormat {
    /// File extension for the format, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Order of the efficiency and stress stages within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineOrder {
    /// Walk the nutrient level first, then compute each row's efficiency from
    /// its post-stress level.
    #[default]
    StressThenTranslate,
    /// Compute efficiencies from the initially sampled levels, then let the
    /// stress walk overwrite the levels. Decay sees the post-stress levels.
    TranslateThenStress,
}

/// How the two Bernoulli trials of a stress-process cycle combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Stress trial and recovery trial are both drawn every cycle.
    #[default]
    Independent,
    /// The recovery trial is only drawn when the stress trial did not fire.
    Exclusive,
}

/// Shape of the per-row RNA decay factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayKind {
    /// `exp(-base_decay * (1 + nutrient_level * decay_variability))`
    #[default]
    Exponential,
    /// `1 - base_decay - nutrient_level * decay_variability`
    Linear,
}

/// Parameters of the logistic translation response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranslationParams {
    /// Efficiency ceiling under optimal conditions.
    pub max_efficiency: f64,
    /// Efficiency floor.
    pub min_efficiency: f64,
    /// Steepness of the logistic curve.
    pub hill_coefficient: f64,
    /// Nutrient level at half-maximal response.
    pub nutrient_threshold: f64,
}

impl Default for TranslationParams {
    fn default() -> Self {
        Self {
            max_efficiency: DEFAULT_MAX_EFFICIENCY,
            min_efficiency: DEFAULT_MIN_EFFICIENCY,
            hill_coefficient: DEFAULT_HILL_COEFFICIENT,
            nutrient_threshold: DEFAULT_NUTRIENT_THRESHOLD,
        }
    }
}

impl TranslationParams {
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidParameter`] for non-finite values, a
    /// negative floor, or a floor above the ceiling.
    pub fn validate(&self) -> Result<(), EcoliFrameError> {
        require_finite("max_efficiency", self.max_efficiency)?;
        require_finite("min_efficiency", self.min_efficiency)?;
        require_finite("hill_coefficient", self.hill_coefficient)?;
        require_finite("nutrient_threshold", self.nutrient_threshold)?;
        if self.min_efficiency < 0.0 {
            return Err(EcoliFrameError::InvalidParameter {
                name: "min_efficiency",
                reason: format!("must not be negative (got {})", self.min_efficiency),
            });
        }
        if self.min_efficiency > self.max_efficiency {
            return Err(EcoliFrameError::InvalidParameter {
                name: "min_efficiency",
                reason: format!(
                    "must not exceed max_efficiency ({} > {})",
                    self.min_efficiency, self.max_efficiency
                ),
            });
        }
        Ok(())
    }
}

/// Parameters of the nutrient stress walk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StressParams {
    /// Chance per cycle of dropping one level.
    pub stress_probability: f64,
    /// Chance per cycle of recovering one level.
    pub recovery_probability: f64,
    /// Combination of the two trials.
    pub transition_mode: TransitionMode,
    /// Starting level of the walk; `None` starts at the highest level.
    pub initial_level: Option<f64>,
}

impl Default for StressParams {
    fn default() -> Self {
        Self {
            stress_probability: DEFAULT_STRESS_PROBABILITY,
            recovery_probability: DEFAULT_RECOVERY_PROBABILITY,
            transition_mode: TransitionMode::Independent,
            initial_level: None,
        }
    }
}

impl StressParams {
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidParameter`] if a probability is
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), EcoliFrameError> {
        require_unit_interval("stress_probability", self.stress_probability)?;
        require_unit_interval("recovery_probability", self.recovery_probability)
    }
}

/// Parameters of the RNA decay model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecayParams {
    /// Baseline degradation rate in `[0, 1]`.
    pub rnase_activity: f64,
    /// Nutrient-dependent spread of the rate in `[0, 1]`.
    pub decay_variability: f64,
    /// Decay factor shape.
    #[serde(rename = "decay_model")]
    pub kind: DecayKind,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            rnase_activity: DEFAULT_RNASE_ACTIVITY,
            decay_variability: DEFAULT_DECAY_VARIABILITY,
            kind: DecayKind::Exponential,
        }
    }
}

impl DecayParams {
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidParameter`] if either rate is outside
    /// `[0, 1]`.
    pub fn validate(&self) -> Result<(), EcoliFrameError> {
        require_unit_interval("rnase_activity", self.rnase_activity)?;
        require_unit_interval("decay_variability", self.decay_variability)
    }
}

/// Configuration settings for a codon translation simulation.
///
/// Threaded explicitly into every stage; nothing reads global settings.
/// Deserializes from a flat JSON object whose keys match the field names of
/// this struct and of the flattened parameter groups.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use ecoliframe_core::config::SimulationConfig;
///
/// let config = SimulationConfig::default();
/// assert_eq!(config.num_cycles, 1000);
/// config.validate()?;
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
///
/// ## Harsher environment, reproducible
///
/// ```rust
/// use ecoliframe_core::config::{SimulationConfig, StressParams};
///
/// let config = SimulationConfig {
///     num_cycles: 200,
///     stress: StressParams {
///         stress_probability: 0.4,
///         ..Default::default()
///     },
///     seed: Some(7),
///     ..Default::default()
/// };
/// # config.validate()?;
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of cycles to simulate.
    ///
    /// **Default**: `1000`
    pub num_cycles: usize,

    /// Nutrient levels, strictly decreasing.
    ///
    /// **Default**: `[1.0, 0.75, 0.5, 0.25, 0.1]`
    pub nutrient_levels: Vec<f64>,

    /// Codons whose efficiency follows the logistic response only.
    ///
    /// **Default**: `["AAA", "GAT"]`
    pub robust_codons: Vec<String>,

    /// Codons whose efficiency is also scaled by the nutrient level.
    ///
    /// **Default**: `["CGT", "CTG"]`
    pub sensitive_codons: Vec<String>,

    /// Base efficiency given to robust codons.
    pub base_efficiency_robust: f64,

    /// Base efficiency given to sensitive codons.
    pub base_efficiency_sensitive: f64,

    #[serde(flatten)]
    pub translation: TranslationParams,

    #[serde(flatten)]
    pub stress: StressParams,

    #[serde(flatten)]
    pub decay: DecayParams,

    /// Requested variability metrics; unknown names are ignored.
    ///
    /// **Default**: all of `variance`, `Fano_factor`, `CV`, `CRI`
    pub metrics: Vec<String>,

    /// Relative order of the efficiency and stress stages.
    pub pipeline_order: PipelineOrder,

    /// Seed of the run's random source; `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Worker threads for replicate runs; `None` uses rayon's default.
    pub num_threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_cycles: DEFAULT_NUM_CYCLES,
            nutrient_levels: DEFAULT_NUTRIENT_LEVELS.to_vec(),
            robust_codons: DEFAULT_ROBUST_CODONS.map(String::from).to_vec(),
            sensitive_codons: DEFAULT_SENSITIVE_CODONS.map(String::from).to_vec(),
            base_efficiency_robust: DEFAULT_BASE_EFFICIENCY_ROBUST,
            base_efficiency_sensitive: DEFAULT_BASE_EFFICIENCY_SENSITIVE,
            translation: TranslationParams::default(),
            stress: StressParams::default(),
            decay: DecayParams::default(),
            metrics: crate::analysis::Metric::ALL
                .map(|metric| metric.name().to_string())
                .to_vec(),
            pipeline_order: PipelineOrder::default(),
            seed: None,
            num_threads: None,
        }
    }
}

impl SimulationConfig {
    /// Runs every parameter check up front, before any computation.
    ///
    /// # Errors
    ///
    /// Returns the first [`EcoliFrameError`] found: zero cycles, a malformed
    /// level set, bad codon tokens, overlapping codon lists, out-of-range
    /// probabilities or rates, or no known metric.
    pub fn validate(&self) -> Result<(), EcoliFrameError> {
        if self.num_cycles == 0 {
            return Err(EcoliFrameError::InvalidInput(
                "num_cycles must be a positive integer".to_string(),
            ));
        }
        let levels = self.level_set()?;
        validate_codon_lists(&self.robust_codons, &self.sensitive_codons)?;
        for (name, value) in [
            ("base_efficiency_robust", self.base_efficiency_robust),
            ("base_efficiency_sensitive", self.base_efficiency_sensitive),
        ] {
            if !(value.is_finite() && value > 0.0 && value <= MAX_BASE_EFFICIENCY) {
                return Err(EcoliFrameError::InvalidParameter {
                    name,
                    reason: format!("must be in (0, {MAX_BASE_EFFICIENCY}] (got {value})"),
                });
            }
        }
        self.translation.validate()?;
        self.stress.validate()?;
        if let Some(initial) = self.stress.initial_level
            && !levels.contains(initial)
        {
            return Err(EcoliFrameError::InvalidParameter {
                name: "initial_level",
                reason: format!("{initial} is not one of {:?}", levels.levels()),
            });
        }
        self.decay.validate()?;
        self.metric_set()?;
        if self.num_threads == Some(0) {
            return Err(EcoliFrameError::InvalidParameter {
                name: "num_threads",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidInput`] if the levels do not form a
    /// valid [`NutrientLevelSet`].
    pub fn level_set(&self) -> Result<NutrientLevelSet, EcoliFrameError> {
        NutrientLevelSet::new(self.nutrient_levels.clone())
    }

    #[must_use]
    pub const fn base_efficiencies(&self) -> BaseEfficiencies {
        BaseEfficiencies {
            robust: self.base_efficiency_robust,
            sensitive: self.base_efficiency_sensitive,
        }
    }

    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidMetrics`] if no requested name is known.
    pub fn metric_set(&self) -> Result<MetricSet, EcoliFrameError> {
        MetricSet::from_names(&self.metrics)
    }

    /// Applies a single `key = value` override as found in key/value config
    /// files. List values are comma separated.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::ParseError`] for unknown keys or values that
    /// do not parse.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), EcoliFrameError> {
        let value = value.trim();
        match key.trim() {
            "num_cycles" => self.num_cycles = parse_value(key, value)?,
            "nutrient_levels" => self.nutrient_levels = parse_list(key, value)?,
            "robust_codons" => self.robust_codons = split_list(value),
            "sensitive_codons" => self.sensitive_codons = split_list(value),
            "base_efficiency_robust" => self.base_efficiency_robust = parse_value(key, value)?,
            "base_efficiency_sensitive" => {
                self.base_efficiency_sensitive = parse_value(key, value)?;
            }
            "max_efficiency" => self.translation.max_efficiency = parse_value(key, value)?,
            "min_efficiency" => self.translation.min_efficiency = parse_value(key, value)?,
            "hill_coefficient" => self.translation.hill_coefficient = parse_value(key, value)?,
            "nutrient_threshold" => {
                self.translation.nutrient_threshold = parse_value(key, value)?;
            }
            "stress_probability" => self.stress.stress_probability = parse_value(key, value)?,
            "recovery_probability" => {
                self.stress.recovery_probability = parse_value(key, value)?;
            }
            "transition_mode" => self.stress.transition_mode = parse_enum(key, value)?,
            "initial_level" => self.stress.initial_level = Some(parse_value(key, value)?),
            "rnase_activity" => self.decay.rnase_activity = parse_value(key, value)?,
            "decay_variability" => self.decay.decay_variability = parse_value(key, value)?,
            "decay_model" => self.decay.kind = parse_enum(key, value)?,
            "metrics" => self.metrics = split_list(value),
            "pipeline_order" => self.pipeline_order = parse_enum(key, value)?,
            "seed" => self.seed = Some(parse_value(key, value)?),
            "num_threads" => self.num_threads = Some(parse_value(key, value)?),
            other => {
                return Err(EcoliFrameError::ParseError(format!(
                    "unknown configuration key '{other}'"
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn require_unit_interval(name: &'static str, value: f64) -> Result<(), EcoliFrameError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EcoliFrameError::InvalidParameter {
            name,
            reason: format!("must be between 0 and 1 (got {value})"),
        })
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<(), EcoliFrameError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EcoliFrameError::InvalidParameter {
            name,
            reason: format!("must be a finite number (got {value})"),
        })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, EcoliFrameError> {
    value
        .parse()
        .map_err(|_| EcoliFrameError::ParseError(format!("invalid value '{value}' for '{key}'")))
}

fn parse_list(key: &str, value: &str) -> Result<Vec<f64>, EcoliFrameError> {
    split_list(value)
        .iter()
        .map(|item| parse_value(key, item))
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn parse_enum<T: for<'de> Deserialize<'de>>(key: &str, value: &str) -> Result<T, EcoliFrameError> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| EcoliFrameError::ParseError(format!("invalid value '{value}' for '{key}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.nutrient_levels, vec![1.0, 0.75, 0.5, 0.25, 0.1]);
        assert_eq!(config.robust_codons, vec!["AAA", "GAT"]);
        assert_eq!(config.metric_set().unwrap().len(), 4);
    }

    #[test]
    fn test_zero_cycles_rejected() {
        let config = SimulationConfig {
            num_cycles: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("num_cycles"));
    }

    #[test]
    fn test_probability_bounds() {
        let mut config = SimulationConfig::default();
        config.stress.stress_probability = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stress_probability must be between 0 and 1"));

        let mut config = SimulationConfig::default();
        config.stress.recovery_probability = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("recovery_probability must be between 0 and 1"));

        let mut config = SimulationConfig::default();
        config.decay.rnase_activity = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlapping_codon_lists_rejected() {
        let config = SimulationConfig {
            robust_codons: vec!["AAA".into()],
            sensitive_codons: vec!["AAA".into()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EcoliFrameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_initial_level_must_be_member() {
        let mut config = SimulationConfig::default();
        config.stress.initial_level = Some(0.6);
        assert!(config.validate().is_err());
        config.stress.initial_level = Some(0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_translation_floor_above_ceiling() {
        let mut config = SimulationConfig::default();
        config.translation.min_efficiency = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_flat_json() {
        let json = r#"{
            "num_cycles": 50,
            "nutrient_levels": [1.0, 0.5],
            "stress_probability": 0.3,
            "rnase_activity": 0.2,
            "decay_model": "linear",
            "hill_coefficient": 4,
            "transition_mode": "exclusive",
            "pipeline_order": "translate_then_stress",
            "metrics": ["CV"]
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.num_cycles, 50);
        assert_eq!(config.stress.stress_probability, 0.3);
        assert_eq!(config.stress.recovery_probability, DEFAULT_RECOVERY_PROBABILITY);
        assert_eq!(config.stress.transition_mode, TransitionMode::Exclusive);
        assert_eq!(config.decay.rnase_activity, 0.2);
        assert_eq!(config.decay.kind, DecayKind::Linear);
        assert_eq!(config.translation.hill_coefficient, 4.0);
        assert_eq!(config.pipeline_order, PipelineOrder::TranslateThenStress);
        assert_eq!(config.robust_codons, vec!["AAA", "GAT"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_override() {
        let mut config = SimulationConfig::default();
        config.apply_override("num_cycles", "25").unwrap();
        config
            .apply_override("nutrient_levels", "1.0, 0.4,0.2")
            .unwrap();
        config.apply_override("robust_codons", "AAA,GGG").unwrap();
        config.apply_override("decay_model", "linear").unwrap();
        config.apply_override("seed", "42").unwrap();
        assert_eq!(config.num_cycles, 25);
        assert_eq!(config.nutrient_levels, vec![1.0, 0.4, 0.2]);
        assert_eq!(config.robust_codons, vec!["AAA", "GGG"]);
        assert_eq!(config.decay.kind, DecayKind::Linear);
        assert_eq!(config.seed, Some(42));

        assert!(config.apply_override("num_cycles", "many").is_err());
        assert!(config.apply_override("colour", "blue").is_err());
        assert!(config.apply_override("decay_model", "cubic").is_err());
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
