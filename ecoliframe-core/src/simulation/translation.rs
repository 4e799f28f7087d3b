use tracing::debug;

use crate::config::TranslationParams;
use crate::types::{Codon, CodonPanel, EcoliFrameError, RobustnessClass, SimulationTable};

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Efficiency of `codon` at `nutrient_level`.
///
/// `max_efficiency * σ(k * (level - threshold)) * scale`, floored at
/// `min_efficiency`, where `scale` is the base efficiency for robust codons and
/// the base efficiency times the level for sensitive ones.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::config::TranslationParams;
/// use ecoliframe_core::simulation::translation_efficiency;
/// use ecoliframe_core::types::{Codon, RobustnessClass};
///
/// let codon = Codon::new("AAA", RobustnessClass::Robust, 1.0);
/// let params = TranslationParams::default();
/// // At the threshold the logistic term is exactly one half.
/// assert!((translation_efficiency(0.5, &codon, &params) - 0.75).abs() < 1e-12);
/// ```
#[must_use]
pub fn translation_efficiency(nutrient_level: f64, codon: &Codon, params: &TranslationParams) -> f64 {
    let response = params.max_efficiency
        * logistic(params.hill_coefficient * (nutrient_level - params.nutrient_threshold));
    let scale = match codon.class {
        RobustnessClass::Robust => codon.base_efficiency,
        RobustnessClass::Sensitive => codon.base_efficiency * nutrient_level,
    };
    (response * scale).max(params.min_efficiency)
}

/// Fills every efficiency slot of `table` from each row's own nutrient level.
///
/// Values are recomputed from scratch per row; previous slot contents are
/// overwritten.
///
/// # Errors
///
/// Returns [`EcoliFrameError::MissingCodonColumn`] if a panel codon has no slot
/// in the table and [`EcoliFrameError::InvalidCodonProfile`] if its base
/// efficiency is unusable.
pub fn simulate_translation(
    table: &mut SimulationTable,
    panel: &CodonPanel,
    params: &TranslationParams,
) -> Result<(), EcoliFrameError> {
    table.check_schema()?;
    let slots = resolve_slots(table, panel)?;

    for row in &mut table.rows {
        for (codon, &slot) in panel.iter().zip(&slots) {
            row.efficiencies[slot] = Some(translation_efficiency(row.nutrient_level, codon, params));
        }
    }

    debug!(
        cycles = table.len(),
        codons = panel.len(),
        "Computed translation efficiencies"
    );
    Ok(())
}

/// Table slot of every panel codon, in panel order.
pub(crate) fn resolve_slots(
    table: &SimulationTable,
    panel: &CodonPanel,
) -> Result<Vec<usize>, EcoliFrameError> {
    panel
        .iter()
        .map(|codon| {
            if !codon.has_valid_base_efficiency() {
                return Err(EcoliFrameError::InvalidCodonProfile(codon.name.clone()));
            }
            table.slot(&codon.name).ok_or_else(|| {
                EcoliFrameError::MissingCodonColumn(format!(
                    "{}{}",
                    codon.name,
                    crate::constants::EFFICIENCY_COLUMN_SUFFIX
                ))
            })
        })
        .collect()
}
