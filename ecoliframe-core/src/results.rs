use crate::analysis::{ValidationReport, VariabilitySummary, generate_summary};
use crate::config::PipelineOrder;
use crate::types::{CodonPanel, SimulationTable};

/// Everything produced by one simulation run.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::{EcoliFrameAnalyzer, config::SimulationConfig};
/// use ecoliframe_core::analysis::{Metric, ReferenceTable};
///
/// let config = SimulationConfig { num_cycles: 100, seed: Some(1), ..Default::default() };
/// let analyzer = EcoliFrameAnalyzer::new(config);
/// let results = analyzer.run(&ReferenceTable::builtin_benchmarks())?;
///
/// println!("Cycles: {}", results.run_info.num_cycles);
/// println!("Mean CV: {:?}", results.variability.mean(Metric::Cv));
/// println!("{}", results.summary_text());
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SimulationResults {
    /// Final table after stress, translation and decay.
    pub table: SimulationTable,

    /// Codon metadata the run was built from.
    pub panel: CodonPanel,

    /// Per-codon variability of the decayed efficiencies.
    pub variability: VariabilitySummary,

    /// Comparison of the variability against the reference data.
    pub validation: ValidationReport,

    pub run_info: RunInfo,
}

impl SimulationResults {
    /// Plain-text summary of the variability means and validation outcomes.
    #[must_use]
    pub fn summary_text(&self) -> String {
        generate_summary(&self.variability, &self.validation)
    }
}

/// Parameters identifying a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInfo {
    /// Seed the run's random source was built from; `None` for entropy seeding.
    pub seed: Option<u64>,
    pub num_cycles: usize,
    pub pipeline_order: PipelineOrder,
    /// Zero-based replicate index; `0` for single runs.
    pub replicate: usize,
}
