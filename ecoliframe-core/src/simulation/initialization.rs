use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::constants::{DEFAULT_BASE_EFFICIENCY_ROBUST, DEFAULT_BASE_EFFICIENCY_SENSITIVE};
use crate::types::{
    Codon, CodonPanel, CycleRecord, EcoliFrameError, NutrientLevelSet, RobustnessClass,
    SimulationTable, validate_codon_token,
};

/// Base efficiency assigned to each robustness class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseEfficiencies {
    pub robust: f64,
    pub sensitive: f64,
}

impl Default for BaseEfficiencies {
    fn default() -> Self {
        Self {
            robust: DEFAULT_BASE_EFFICIENCY_ROBUST,
            sensitive: DEFAULT_BASE_EFFICIENCY_SENSITIVE,
        }
    }
}

impl BaseEfficiencies {
    const fn for_class(self, class: RobustnessClass) -> f64 {
        match class {
            RobustnessClass::Robust => self.robust,
            RobustnessClass::Sensitive => self.sensitive,
        }
    }
}

/// Initial table plus the codon metadata that goes with it.
#[derive(Debug, Clone)]
pub struct Initialization {
    pub table: SimulationTable,
    pub panel: CodonPanel,
}

/// Checks the robust and sensitive codon lists before a panel is built.
///
/// # Errors
///
/// Returns [`EcoliFrameError::InvalidInput`] if both lists are empty, a token
/// is malformed, or a codon appears more than once across the two lists.
pub fn validate_codon_lists<S: AsRef<str>>(
    robust: &[S],
    sensitive: &[S],
) -> Result<(), EcoliFrameError> {
    if robust.is_empty() && sensitive.is_empty() {
        return Err(EcoliFrameError::InvalidInput(
            "at least one robust or sensitive codon is required".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for codon in robust.iter().chain(sensitive) {
        let codon: &str = codon.as_ref();
        validate_codon_token(codon)?;
        if !seen.insert(codon) {
            return Err(EcoliFrameError::InvalidInput(format!(
                "codon '{codon}' is listed more than once; robust and sensitive codons must be disjoint"
            )));
        }
    }
    Ok(())
}

/// Builds the initial simulation table and its codon panel.
///
/// Each row gets a nutrient level drawn uniformly from `levels`; every
/// efficiency slot starts empty. Robust codons take the first slots, sensitive
/// codons follow.
///
/// # Errors
///
/// Returns [`EcoliFrameError::InvalidInput`] for a zero cycle count or invalid
/// codon lists, and [`EcoliFrameError::InvalidParameter`] for a base
/// efficiency outside `(0, 1.5]`.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::simulation::{BaseEfficiencies, initialize_simulation};
/// use ecoliframe_core::types::NutrientLevelSet;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let levels = NutrientLevelSet::new(vec![1.0, 0.5])?;
/// let mut rng = StdRng::seed_from_u64(1);
/// let init = initialize_simulation(
///     10, &levels, &["AAA"], &["CGT"], BaseEfficiencies::default(), &mut rng,
/// )?;
/// assert_eq!(init.table.len(), 10);
/// assert_eq!(init.panel.len(), 2);
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
pub fn initialize_simulation<S, R>(
    num_cycles: usize,
    levels: &NutrientLevelSet,
    robust: &[S],
    sensitive: &[S],
    base: BaseEfficiencies,
    rng: &mut R,
) -> Result<Initialization, EcoliFrameError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if num_cycles == 0 {
        return Err(EcoliFrameError::InvalidInput(
            "num_cycles must be a positive integer".to_string(),
        ));
    }
    validate_codon_lists(robust, sensitive)?;

    let codons: Vec<Codon> = robust
        .iter()
        .map(|name| (name, RobustnessClass::Robust))
        .chain(sensitive.iter().map(|name| (name, RobustnessClass::Sensitive)))
        .map(|(name, class)| Codon::new(name.as_ref(), class, base.for_class(class)))
        .collect();
    if let Some(codon) = codons.iter().find(|codon| !codon.has_valid_base_efficiency()) {
        return Err(EcoliFrameError::InvalidParameter {
            name: match codon.class {
                RobustnessClass::Robust => "base_efficiency_robust",
                RobustnessClass::Sensitive => "base_efficiency_sensitive",
            },
            reason: format!("must be in (0, 1.5] (got {})", codon.base_efficiency),
        });
    }
    let panel = CodonPanel::new(codons)?;

    let rows = (1..=num_cycles)
        .map(|cycle| {
            let position = rng.gen_range(0..levels.len());
            let level = levels.levels()[position];
            CycleRecord::unfilled(cycle, level, panel.len())
        })
        .collect();
    let table = SimulationTable::with_index(panel.index().clone(), rows)?;

    debug!(
        cycles = num_cycles,
        codons = panel.len(),
        "Initialized simulation table"
    );
    Ok(Initialization { table, panel })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn levels() -> NutrientLevelSet {
        NutrientLevelSet::new(vec![1.0, 0.75, 0.5, 0.25, 0.1]).unwrap()
    }

    #[test]
    fn test_initialize_shapes_table() {
        let mut rng = StdRng::seed_from_u64(3);
        let init = initialize_simulation(
            50,
            &levels(),
            &["AAA", "GAT"],
            &["CGT", "CTG"],
            BaseEfficiencies::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(init.table.len(), 50);
        assert_eq!(init.table.codon_names(), &["AAA", "GAT", "CGT", "CTG"]);
        for (i, row) in init.table.rows.iter().enumerate() {
            assert_eq!(row.cycle, i + 1);
            assert!(levels().contains(row.nutrient_level));
            assert!(row.efficiencies.iter().all(Option::is_none));
        }
        assert_eq!(init.panel.get("AAA").unwrap().base_efficiency, 1.0);
        assert_eq!(init.panel.get("CTG").unwrap().base_efficiency, 0.5);
        assert_eq!(
            init.panel.get("CGT").unwrap().class,
            RobustnessClass::Sensitive
        );
    }

    #[test]
    fn test_initialize_samples_every_level() {
        let mut rng = StdRng::seed_from_u64(11);
        let init = initialize_simulation(
            500,
            &levels(),
            &["AAA"],
            &[],
            BaseEfficiencies::default(),
            &mut rng,
        )
        .unwrap();
        for level in levels().levels() {
            assert!(init.table.rows.iter().any(|row| row.nutrient_level == *level));
        }
    }

    #[test]
    fn test_initialize_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let base = BaseEfficiencies::default();
        assert!(initialize_simulation(0, &levels(), &["AAA"], &[], base, &mut rng).is_err());
        assert!(initialize_simulation(5, &levels(), &["AA1"], &[], base, &mut rng).is_err());
        assert!(initialize_simulation(5, &levels(), &["AAA"], &["AAA"], base, &mut rng).is_err());
        let none: [&str; 0] = [];
        assert!(initialize_simulation(5, &levels(), &none, &none, base, &mut rng).is_err());

        let bad_base = BaseEfficiencies {
            robust: 2.0,
            sensitive: 0.5,
        };
        let err =
            initialize_simulation(5, &levels(), &["AAA"], &[], bad_base, &mut rng).unwrap_err();
        assert!(err.to_string().contains("base_efficiency_robust"));
    }

    #[test]
    fn test_same_seed_same_levels() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            initialize_simulation(
                20,
                &levels(),
                &["AAA"],
                &["CGT"],
                BaseEfficiencies::default(),
                &mut rng,
            )
            .unwrap()
            .table
            .nutrient_levels()
        };
        assert_eq!(run(9), run(9));
    }
}
