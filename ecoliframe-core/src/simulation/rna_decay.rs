use tracing::debug;

use super::translation::resolve_slots;
use crate::config::{DecayKind, DecayParams};
use crate::types::{CodonPanel, EcoliFrameError, SimulationTable};

/// Per-row multiplier applied to an efficiency, kept within `[0, 1]`.
///
/// `base_decay` already folds in the codon's base efficiency; see
/// [`process_rna`].
#[must_use]
pub fn decay_factor(kind: DecayKind, base_decay: f64, nutrient_level: f64, decay_variability: f64) -> f64 {
    let factor = match kind {
        DecayKind::Exponential => (-base_decay * (1.0 + nutrient_level * decay_variability)).exp(),
        DecayKind::Linear => 1.0 - base_decay - nutrient_level * decay_variability,
    };
    factor.clamp(0.0, 1.0)
}

/// Attenuates every codon's efficiencies by RNase degradation.
///
/// For each codon the rate is
/// `rnase_activity * (1 + decay_variability * (1 - base_efficiency))`, so
/// weaker codons decay faster. Each present efficiency is multiplied by
/// [`decay_factor`] and clipped at zero; missing values stay missing.
///
/// Returns a new table and leaves `table` unchanged.
///
/// # Errors
///
/// - [`EcoliFrameError::InvalidParameter`] if a rate is outside `[0, 1]`
/// - [`EcoliFrameError::EmptyTable`] for a table without rows
/// - [`EcoliFrameError::Schema`] if a row's width does not match the codon index
/// - [`EcoliFrameError::InvalidCodonProfile`] for an unusable base efficiency
/// - [`EcoliFrameError::MissingCodonColumn`] if a panel codon has no slot
pub fn process_rna(
    table: &SimulationTable,
    panel: &CodonPanel,
    params: &DecayParams,
) -> Result<SimulationTable, EcoliFrameError> {
    params.validate()?;
    if table.is_empty() {
        return Err(EcoliFrameError::EmptyTable("process_rna"));
    }
    table.check_schema()?;
    let slots = resolve_slots(table, panel)?;

    let mut decayed = table.clone();
    for (codon, &slot) in panel.iter().zip(&slots) {
        let base_decay = params.rnase_activity
            * (1.0 + params.decay_variability * (1.0 - codon.base_efficiency));
        for row in &mut decayed.rows {
            if let Some(efficiency) = row.efficiencies[slot].as_mut() {
                let factor = decay_factor(
                    params.kind,
                    base_decay,
                    row.nutrient_level,
                    params.decay_variability,
                );
                *efficiency = (*efficiency * factor).max(0.0);
            }
        }
        debug!(codon = %codon.name, base_decay, "Applied RNA decay");
    }
    Ok(decayed)
}
