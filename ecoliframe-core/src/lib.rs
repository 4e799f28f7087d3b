//! # EcoliFrame - codon translation efficiency under nutrient stress
//!
//! A discrete-time simulation of how the translation efficiency of a small
//! codon panel responds to a fluctuating nutrient supply and RNA decay, with
//! per-codon variability statistics validated against reference benchmarks.
//!
//! ## Overview
//!
//! Each run walks through the same pipeline:
//!
//! 1. **Initialization**: one row per cycle with a randomly sampled nutrient
//!    level and an empty efficiency slot per codon
//! 2. **Nutrient stress**: a bounded random walk over the configured levels
//! 3. **Translation**: a logistic response of efficiency to nutrient level
//! 4. **RNA decay**: exponential (or linear) attenuation of the efficiencies
//! 5. **Variability**: variance, Fano factor, CV and CRI per codon
//! 6. **Validation**: Pearson correlation and squared error against references
//!
//! Stages 2 and 3 can be swapped through
//! [`PipelineOrder`](config::PipelineOrder).
//!
//! ## Quick Start
//!
//! ```rust
//! use ecoliframe_core::{EcoliFrameAnalyzer, config::SimulationConfig};
//! use ecoliframe_core::analysis::ReferenceTable;
//!
//! let config = SimulationConfig {
//!     num_cycles: 250,
//!     seed: Some(2024),
//!     ..Default::default()
//! };
//! let analyzer = EcoliFrameAnalyzer::new(config);
//! let results = analyzer.run(&ReferenceTable::builtin_benchmarks())?;
//!
//! println!("{}", results.summary_text());
//! # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
//! ```
//!
//! ## Architecture
//!
//! The engine uses a type-state pattern so that analysis is only available
//! after the simulation stages have run:
//!
//! ```rust
//! use ecoliframe_core::engine::PendingEcoliFrame;
//! use ecoliframe_core::config::SimulationConfig;
//! use ecoliframe_core::analysis::ReferenceTable;
//!
//! let pending = PendingEcoliFrame::with_config(SimulationConfig::default())?;
//! let simulated = pending.simulate()?;
//! let results = simulated.analyze(&ReferenceTable::builtin_benchmarks());
//! assert_eq!(results.table.len(), 1000);
//! # Ok::<(), ecoliframe_core::types::EcoliFrameError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Simulation settings and their validation
//! - [`engine`]: Run orchestration and replicate execution
//! - [`types`]: Codons, levels, the simulation table and the error type
//! - [`simulation`]: Initialization, stress, translation and decay stages
//! - [`analysis`]: Variability metrics, validation and the text summary
//! - [`input`]: Configuration files and reference tables
//! - [`output`]: CSV, JSON and text writers
//! - [`results`]: Results of a run
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, EcoliFrameError>`](types::EcoliFrameError).
//! Invalid configuration and schema problems are errors; degenerate data
//! (empty traces, undefined ratios, constant inputs) never is. It shows up as
//! `None` values in the variability summary or as skipped metrics in the
//! validation report.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod engine;
pub mod input;
pub mod output;
pub mod results;
pub mod simulation;
pub mod types;

pub use engine::EcoliFrameAnalyzer;
pub use types::EcoliFrameError;
