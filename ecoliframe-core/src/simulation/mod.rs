//! Pipeline stages that build and evolve the per-cycle simulation table.
//!
//! The stages run in this order by default:
//!
//! 1. [`initialization`]: sample nutrient levels and lay out codon slots
//! 2. [`nutrient_stress`]: walk the nutrient level across cycles
//! 3. [`translation`]: fill every efficiency slot from the row's level
//! 4. [`rna_decay`]: attenuate the efficiencies
//!
//! Stages 2 and 3 swap under
//! [`PipelineOrder::TranslateThenStress`](crate::config::PipelineOrder).

pub mod initialization;
pub mod nutrient_stress;
pub mod rna_decay;
pub mod translation;

pub use initialization::{BaseEfficiencies, Initialization, initialize_simulation};
pub use nutrient_stress::{NutrientWalk, apply_nutrient_stress};
pub use rna_decay::{decay_factor, process_rna};
pub use translation::{simulate_translation, translation_efficiency};
