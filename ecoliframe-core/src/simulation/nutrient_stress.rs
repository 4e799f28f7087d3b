use rand::Rng;
use tracing::debug;

use crate::config::{StressParams, TransitionMode};
use crate::types::{EcoliFrameError, NutrientLevelSet, SimulationTable};

/// Bounded random walk over a [`NutrientLevelSet`].
///
/// Position 0 is the highest level. A stress step moves one position toward
/// the lowest level, a recovery step one position back; neither wraps.
#[derive(Debug, Clone)]
pub struct NutrientWalk<'a> {
    levels: &'a NutrientLevelSet,
    position: usize,
    stress_probability: f64,
    recovery_probability: f64,
    mode: TransitionMode,
}

impl<'a> NutrientWalk<'a> {
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidParameter`] if a probability is outside
    /// `[0, 1]` or the initial level is not in `levels`.
    pub fn new(levels: &'a NutrientLevelSet, params: &StressParams) -> Result<Self, EcoliFrameError> {
        params.validate()?;
        let position = match params.initial_level {
            None => 0,
            Some(level) => levels
                .position(level)
                .ok_or_else(|| EcoliFrameError::InvalidParameter {
                    name: "initial_level",
                    reason: format!("{level} is not one of {:?}", levels.levels()),
                })?,
        };
        Ok(Self {
            levels,
            position,
            stress_probability: params.stress_probability,
            recovery_probability: params.recovery_probability,
            mode: params.transition_mode,
        })
    }

    /// Current level of the walk.
    #[must_use]
    pub fn level(&self) -> f64 {
        self.levels.levels()[self.position]
    }

    /// Advances one cycle and returns the new level.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let stressed = rng.gen_range(0.0..1.0) < self.stress_probability;
        if stressed && self.position + 1 < self.levels.len() {
            self.position += 1;
        }
        let try_recovery = match self.mode {
            TransitionMode::Independent => true,
            TransitionMode::Exclusive => !stressed,
        };
        if try_recovery && rng.gen_range(0.0..1.0) < self.recovery_probability && self.position > 0 {
            self.position -= 1;
        }
        self.level()
    }
}

/// Runs the nutrient walk over `table`, writing one level per cycle.
///
/// The walk starts at `params.initial_level` (the highest level when unset)
/// and ignores the levels already in the table. The input table is left
/// untouched; an empty table comes back as-is without drawing.
///
/// # Errors
///
/// Returns [`EcoliFrameError::InvalidParameter`] for out-of-range
/// probabilities or an initial level outside `levels`. Validation happens
/// before any row is touched.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::config::StressParams;
/// use ecoliframe_core::simulation::apply_nutrient_stress;
/// use ecoliframe_core::types::{CycleRecord, NutrientLevelSet, SimulationTable};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let levels = NutrientLevelSet::new(vec![1.0, 0.5, 0.1])?;
/// let rows = (1..=5).map(|c| CycleRecord::unfilled(c, 1.0, 0)).collect();
/// let table = SimulationTable::new(vec![], rows)?;
/// let params = StressParams { stress_probability: 1.0, recovery_probability: 0.0, ..Default::default() };
///
/// let stressed = apply_nutrient_stress(&table, &levels, &params, &mut StdRng::seed_from_u64(0))?;
/// assert_eq!(stressed.nutrient_levels(), vec![0.5, 0.1, 0.1, 0.1, 0.1]);
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
pub fn apply_nutrient_stress<R: Rng + ?Sized>(
    table: &SimulationTable,
    levels: &NutrientLevelSet,
    params: &StressParams,
    rng: &mut R,
) -> Result<SimulationTable, EcoliFrameError> {
    let mut walk = NutrientWalk::new(levels, params)?;
    let mut stressed = table.clone();
    if stressed.is_empty() {
        return Ok(stressed);
    }

    let mut transitions = 0usize;
    let mut previous = walk.level();
    for row in &mut stressed.rows {
        row.nutrient_level = walk.step(rng);
        if row.nutrient_level != previous {
            transitions += 1;
            previous = row.nutrient_level;
        }
    }

    debug!(
        cycles = stressed.len(),
        transitions,
        final_level = walk.level(),
        "Applied nutrient stress"
    );
    Ok(stressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CycleRecord;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn levels() -> NutrientLevelSet {
        NutrientLevelSet::new(vec![1.0, 0.75, 0.5, 0.25, 0.1]).unwrap()
    }

    fn table(cycles: usize, level: f64) -> SimulationTable {
        let rows = (1..=cycles)
            .map(|cycle| CycleRecord::unfilled(cycle, level, 1))
            .collect();
        SimulationTable::new(vec!["AAA".into()], rows).unwrap()
    }

    fn params(stress: f64, recovery: f64) -> StressParams {
        StressParams {
            stress_probability: stress,
            recovery_probability: recovery,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_stress_descends_to_lowest() {
        let mut rng = StdRng::seed_from_u64(1);
        let stressed =
            apply_nutrient_stress(&table(10, 1.0), &levels(), &params(1.0, 0.0), &mut rng).unwrap();
        let trace = stressed.nutrient_levels();
        assert!(trace.windows(2).all(|pair| pair[1] <= pair[0]));
        assert_eq!(*trace.last().unwrap(), 0.1);
    }

    #[test]
    fn test_full_recovery_stays_at_highest() {
        let mut rng = StdRng::seed_from_u64(2);
        let stressed =
            apply_nutrient_stress(&table(25, 0.1), &levels(), &params(0.0, 1.0), &mut rng).unwrap();
        assert!(stressed.nutrient_levels().iter().all(|&level| level == 1.0));
    }

    #[test]
    fn test_initial_level_starts_walk() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = StressParams {
            initial_level: Some(0.1),
            ..params(0.0, 1.0)
        };
        let trace = apply_nutrient_stress(&table(5, 1.0), &levels(), &p, &mut rng)
            .unwrap()
            .nutrient_levels();
        assert_eq!(trace, vec![0.25, 0.5, 0.75, 1.0, 1.0]);
    }

    #[test]
    fn test_independent_trials_cancel_out() {
        // Both trials fire every cycle: down one, then back up.
        let mut rng = StdRng::seed_from_u64(4);
        let trace = apply_nutrient_stress(&table(8, 0.5), &levels(), &params(1.0, 1.0), &mut rng)
            .unwrap()
            .nutrient_levels();
        assert!(trace.iter().all(|&level| level == 1.0));
    }

    #[test]
    fn test_exclusive_mode_skips_recovery_after_stress() {
        let mut rng = StdRng::seed_from_u64(4);
        let p = StressParams {
            transition_mode: TransitionMode::Exclusive,
            ..params(1.0, 1.0)
        };
        let trace = apply_nutrient_stress(&table(6, 1.0), &levels(), &p, &mut rng)
            .unwrap()
            .nutrient_levels();
        assert_eq!(trace, vec![0.75, 0.5, 0.25, 0.1, 0.1, 0.1]);
    }

    #[test]
    fn test_empty_table_returned_unchanged() {
        let empty = SimulationTable::new(vec!["AAA".into()], vec![]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let result = apply_nutrient_stress(&empty, &levels(), &params(0.5, 0.5), &mut rng).unwrap();
        assert_eq!(result, empty);
    }

    #[test]
    fn test_invalid_parameters_fail_before_mutation() {
        let input = table(3, 0.5);
        let mut rng = StdRng::seed_from_u64(0);
        let err =
            apply_nutrient_stress(&input, &levels(), &params(1.2, 0.0), &mut rng).unwrap_err();
        assert!(err.to_string().contains("stress_probability"));
        assert!(apply_nutrient_stress(&input, &levels(), &params(0.1, -0.5), &mut rng).is_err());

        let p = StressParams {
            initial_level: Some(0.3),
            ..params(0.1, 0.1)
        };
        assert!(apply_nutrient_stress(&input, &levels(), &p, &mut rng).is_err());
        assert!(input.nutrient_levels().iter().all(|&level| level == 0.5));
    }

    #[test]
    fn test_input_table_not_mutated() {
        let input = table(20, 0.5);
        let mut rng = StdRng::seed_from_u64(8);
        let _ = apply_nutrient_stress(&input, &levels(), &params(0.5, 0.5), &mut rng).unwrap();
        assert_eq!(input, table(20, 0.5));
    }

    proptest! {
        #[test]
        fn prop_levels_stay_in_set(
            stress in 0.0f64..=1.0,
            recovery in 0.0f64..=1.0,
            seed in any::<u64>(),
            cycles in 1usize..200,
        ) {
            let set = levels();
            let mut rng = StdRng::seed_from_u64(seed);
            let stressed = apply_nutrient_stress(
                &table(cycles, 1.0),
                &set,
                &params(stress, recovery),
                &mut rng,
            ).unwrap();
            prop_assert_eq!(stressed.len(), cycles);
            for level in stressed.nutrient_levels() {
                prop_assert!(set.contains(level));
            }
        }

        #[test]
        fn prop_steps_move_at_most_one_position(seed in any::<u64>()) {
            let set = levels();
            let mut rng = StdRng::seed_from_u64(seed);
            let trace = apply_nutrient_stress(&table(100, 1.0), &set, &params(0.3, 0.3), &mut rng)
                .unwrap()
                .nutrient_levels();
            for pair in trace.windows(2) {
                let a = set.position(pair[0]).unwrap();
                let b = set.position(pair[1]).unwrap();
                prop_assert!(a.abs_diff(b) <= 1);
            }
        }
    }
}
