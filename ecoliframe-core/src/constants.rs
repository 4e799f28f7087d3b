// =============================================================================
// Simulation defaults
// =============================================================================

/// Version string for ecoliframe
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of simulated cycles
pub const DEFAULT_NUM_CYCLES: usize = 1000;

/// Default nutrient level set, highest (most nutrients) first
pub const DEFAULT_NUTRIENT_LEVELS: [f64; 5] = [1.0, 0.75, 0.5, 0.25, 0.1];

/// Default codons that keep their efficiency under stress
pub const DEFAULT_ROBUST_CODONS: [&str; 2] = ["AAA", "GAT"];

/// Default codons whose efficiency scales with the nutrient level
pub const DEFAULT_SENSITIVE_CODONS: [&str; 2] = ["CGT", "CTG"];

/// Default base efficiency of robust codons
pub const DEFAULT_BASE_EFFICIENCY_ROBUST: f64 = 1.0;

/// Default base efficiency of sensitive codons
pub const DEFAULT_BASE_EFFICIENCY_SENSITIVE: f64 = 0.5;

/// Upper bound accepted for any codon base efficiency
pub const MAX_BASE_EFFICIENCY: f64 = 1.5;

// =============================================================================
// Translation response curve
// =============================================================================

/// Maximum codon efficiency under optimal conditions
pub const DEFAULT_MAX_EFFICIENCY: f64 = 1.5;

/// Efficiency floor under severe stress
pub const DEFAULT_MIN_EFFICIENCY: f64 = 0.1;

/// Steepness of the logistic response
pub const DEFAULT_HILL_COEFFICIENT: f64 = 2.0;

/// Nutrient level giving half-maximal efficiency
pub const DEFAULT_NUTRIENT_THRESHOLD: f64 = 0.5;

// =============================================================================
// Stress and decay
// =============================================================================

/// Probability of dropping one nutrient level per cycle
pub const DEFAULT_STRESS_PROBABILITY: f64 = 0.1;

/// Probability of recovering one nutrient level per cycle
pub const DEFAULT_RECOVERY_PROBABILITY: f64 = 0.05;

/// Baseline RNase degradation rate
pub const DEFAULT_RNASE_ACTIVITY: f64 = 0.05;

/// Nutrient-dependent spread of the decay rate
pub const DEFAULT_DECAY_VARIABILITY: f64 = 0.1;

// =============================================================================
// Codon tokens and tabular naming
// =============================================================================

/// Length of a codon token
pub const CODON_LENGTH: usize = 3;

/// Letters a codon token may use (DNA and RNA alphabets)
pub const CODON_ALPHABET: &[u8] = b"ACGTU";

/// Suffix of per-codon efficiency columns in exported tables
pub const EFFICIENCY_COLUMN_SUFFIX: &str = "_efficiency";

/// Name of the codon identifier column in summaries and reference tables
pub const CODON_COLUMN: &str = "codon";
