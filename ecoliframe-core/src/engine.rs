use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::info;

use crate::analysis::{MetricSet, ReferenceTable, summarize, validate_simulation};
use crate::config::{PipelineOrder, SimulationConfig};
use crate::results::{RunInfo, SimulationResults};
use crate::simulation::{
    apply_nutrient_stress, initialize_simulation, process_rna, simulate_translation,
};
use crate::types::{CodonPanel, EcoliFrameError, NutrientLevelSet, SimulationTable};

/// Marker trait for the stage an [`EcoliFrame`] has reached.
///
/// Used in the type-state pattern so that analysis can only be requested
/// once the simulation has run.
pub trait SimulationState {}

/// A configured run that has not simulated yet.
#[derive(Debug, Clone)]
pub struct Pending;

/// A run whose table has been through stress, translation and decay.
#[derive(Debug, Clone)]
pub struct Simulated {
    table: SimulationTable,
    panel: CodonPanel,
}

impl SimulationState for Pending {}
impl SimulationState for Simulated {}

/// One simulation run, moving from [`Pending`] to [`Simulated`].
///
/// The run owns its random source; the same seed always reproduces the same
/// table.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::engine::PendingEcoliFrame;
/// use ecoliframe_core::config::SimulationConfig;
/// use ecoliframe_core::analysis::ReferenceTable;
///
/// let config = SimulationConfig { num_cycles: 50, seed: Some(3), ..Default::default() };
/// let pending = PendingEcoliFrame::with_config(config)?;
/// let simulated = pending.simulate()?;
/// assert_eq!(simulated.table().len(), 50);
///
/// let results = simulated.analyze(&ReferenceTable::builtin_benchmarks());
/// assert_eq!(results.variability.len(), 4);
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EcoliFrame<S: SimulationState> {
    /// Settings of the run
    pub config: SimulationConfig,
    levels: NutrientLevelSet,
    metrics: MetricSet,
    rng: StdRng,
    run_info: RunInfo,
    state: S,
}

/// Type alias for a run that still has to simulate.
pub type PendingEcoliFrame = EcoliFrame<Pending>;

/// Type alias for a run ready for analysis.
pub type SimulatedEcoliFrame = EcoliFrame<Simulated>;

impl PendingEcoliFrame {
    /// Validates `config` and seeds the run's random source from
    /// `config.seed`, or from entropy when unset.
    ///
    /// # Errors
    ///
    /// Returns the first [`EcoliFrameError`] reported by
    /// [`SimulationConfig::validate`].
    pub fn with_config(config: SimulationConfig) -> Result<Self, EcoliFrameError> {
        let seed = config.seed;
        Self::build(config, seed, 0)
    }

    /// Like [`with_config`](Self::with_config) but with an explicit seed and
    /// replicate index.
    ///
    /// # Errors
    ///
    /// See [`with_config`](Self::with_config).
    pub fn with_seed(
        config: SimulationConfig,
        seed: u64,
        replicate: usize,
    ) -> Result<Self, EcoliFrameError> {
        Self::build(config, Some(seed), replicate)
    }

    fn build(
        config: SimulationConfig,
        seed: Option<u64>,
        replicate: usize,
    ) -> Result<Self, EcoliFrameError> {
        config.validate()?;
        let levels = config.level_set()?;
        let metrics = config.metric_set()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let run_info = RunInfo {
            seed,
            num_cycles: config.num_cycles,
            pipeline_order: config.pipeline_order,
            replicate,
        };
        Ok(Self {
            config,
            levels,
            metrics,
            rng,
            run_info,
            state: Pending,
        })
    }

    /// Runs initialization, nutrient stress, translation and RNA decay in the
    /// configured order.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError`] if a stage rejects its input.
    pub fn simulate(self) -> Result<SimulatedEcoliFrame, EcoliFrameError> {
        let Self {
            config,
            levels,
            metrics,
            mut rng,
            run_info,
            state: Pending,
        } = self;

        let init = initialize_simulation(
            config.num_cycles,
            &levels,
            &config.robust_codons,
            &config.sensitive_codons,
            config.base_efficiencies(),
            &mut rng,
        )?;
        info!(
            cycles = init.table.len(),
            codons = init.panel.len(),
            replicate = run_info.replicate,
            "Initialized simulation"
        );

        let table = match config.pipeline_order {
            PipelineOrder::StressThenTranslate => {
                let mut stressed =
                    apply_nutrient_stress(&init.table, &levels, &config.stress, &mut rng)?;
                info!("Applied nutrient stress");
                simulate_translation(&mut stressed, &init.panel, &config.translation)?;
                info!("Simulated translation");
                stressed
            }
            PipelineOrder::TranslateThenStress => {
                let mut translated = init.table;
                simulate_translation(&mut translated, &init.panel, &config.translation)?;
                info!("Simulated translation");
                let stressed =
                    apply_nutrient_stress(&translated, &levels, &config.stress, &mut rng)?;
                info!("Applied nutrient stress");
                stressed
            }
        };

        let decayed = process_rna(&table, &init.panel, &config.decay)?;
        info!(model = ?config.decay.kind, "Processed RNA decay");

        Ok(EcoliFrame {
            config,
            levels,
            metrics,
            rng,
            run_info,
            state: Simulated {
                table: decayed,
                panel: init.panel,
            },
        })
    }
}

impl SimulatedEcoliFrame {
    /// Final decayed table.
    #[must_use]
    pub const fn table(&self) -> &SimulationTable {
        &self.state.table
    }

    #[must_use]
    pub const fn panel(&self) -> &CodonPanel {
        &self.state.panel
    }

    #[must_use]
    pub const fn levels(&self) -> &NutrientLevelSet {
        &self.levels
    }

    /// Summarizes variability and validates it against `reference`.
    #[must_use]
    pub fn analyze(self, reference: &ReferenceTable) -> SimulationResults {
        let variability = summarize(&self.state.table, &self.metrics);
        info!(codons = variability.len(), "Analyzed codon variability");
        let validation = validate_simulation(&variability, reference, &self.metrics);
        info!(
            compared = validation.compared_count(),
            metrics = validation.len(),
            "Validated simulation"
        );
        SimulationResults {
            table: self.state.table,
            panel: self.state.panel,
            variability,
            validation,
            run_info: self.run_info,
        }
    }
}

/// High-level entry point running the whole pipeline.
///
/// # Examples
///
/// ```rust
/// use ecoliframe_core::EcoliFrameAnalyzer;
/// use ecoliframe_core::analysis::ReferenceTable;
/// use ecoliframe_core::config::SimulationConfig;
///
/// let config = SimulationConfig { num_cycles: 60, seed: Some(10), ..Default::default() };
/// let analyzer = EcoliFrameAnalyzer::new(config);
/// let replicates = analyzer.run_replicates(3, &ReferenceTable::builtin_benchmarks())?;
/// assert_eq!(replicates.len(), 3);
/// assert_eq!(replicates[2].run_info.seed, Some(12));
/// # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EcoliFrameAnalyzer {
    pub config: SimulationConfig,
}

impl EcoliFrameAnalyzer {
    #[must_use]
    pub const fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Simulates and analyzes a single run.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError`] for invalid configuration or stage input.
    pub fn run(&self, reference: &ReferenceTable) -> Result<SimulationResults, EcoliFrameError> {
        let simulated = PendingEcoliFrame::with_config(self.config.clone())?.simulate()?;
        Ok(simulated.analyze(reference))
    }

    /// Runs `count` independent replicates on a dedicated thread pool.
    ///
    /// Replicate `i` is seeded with `seed + i`. Without a configured seed a
    /// base seed is drawn once from entropy, so every replicate still reports
    /// the seed that reproduces it. Results come back in replicate order.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidParameter`] for a zero count or a
    /// thread pool that cannot be built, and the first error of any replicate.
    pub fn run_replicates(
        &self,
        count: usize,
        reference: &ReferenceTable,
    ) -> Result<Vec<SimulationResults>, EcoliFrameError> {
        if count == 0 {
            return Err(EcoliFrameError::InvalidParameter {
                name: "replicates",
                reason: "must be at least 1".to_string(),
            });
        }
        self.config.validate()?;
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads.unwrap_or(0))
            .build()
            .map_err(|e| EcoliFrameError::InvalidParameter {
                name: "num_threads",
                reason: format!("failed to configure thread pool: {e}"),
            })?;
        info!(
            replicates = count,
            threads = pool.current_num_threads(),
            base_seed,
            "Running replicates"
        );

        pool.install(|| {
            (0..count)
                .into_par_iter()
                .map(|replicate| -> Result<SimulationResults, EcoliFrameError> {
                    let seed = base_seed.wrapping_add(replicate as u64);
                    let pending =
                        PendingEcoliFrame::with_seed(self.config.clone(), seed, replicate)?;
                    Ok(pending.simulate()?.analyze(reference))
                })
                .collect()
        })
    }
}
