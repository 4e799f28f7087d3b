//! Persistence of simulation results.
//!
//! A run produces four artifacts in its output directory:
//!
//! - `variability_metrics.{csv,json}`: per-codon variability statistics
//! - `simulation_table.{csv,json}`: the final per-cycle table
//! - `validation_results.json`: outcome per validated metric
//! - `simulation_summary.txt`: plain-text overview
//!
//! The tabular artifacts follow the requested [`OutputFormat`]; the other two
//! always use their fixed format.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use ecoliframe_core::{EcoliFrameAnalyzer, config::{OutputFormat, SimulationConfig}};
//! use ecoliframe_core::analysis::ReferenceTable;
//! use ecoliframe_core::output::write_results;
//!
//! let analyzer = EcoliFrameAnalyzer::new(SimulationConfig::default());
//! let results = analyzer.run(&ReferenceTable::builtin_benchmarks())?;
//!
//! let written = write_results("results", &results, OutputFormat::Json)?;
//! for path in written {
//!     println!("wrote {}", path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analysis::VariabilitySummary;
use crate::config::OutputFormat;
use crate::results::SimulationResults;
use crate::types::{EcoliFrameError, SimulationTable};

mod formats {
    pub mod csv;
    pub mod json;
}

pub use formats::csv::{write_table_csv, write_variability_csv};
pub use formats::json::{write_table_json, write_validation_json, write_variability_json};

pub const VARIABILITY_FILE_STEM: &str = "variability_metrics";
pub const TABLE_FILE_STEM: &str = "simulation_table";
pub const VALIDATION_FILE_NAME: &str = "validation_results.json";
pub const SUMMARY_FILE_NAME: &str = "simulation_summary.txt";

/// Creates `path` and its parents if needed.
///
/// Returns `true` if the directory was created and `false` if it already
/// existed.
///
/// # Errors
///
/// Returns [`EcoliFrameError::IoError`] if the directory cannot be created or
/// `path` exists but is not a directory.
pub fn ensure_output_directory<P: AsRef<Path>>(path: P) -> Result<bool, EcoliFrameError> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}

/// Writes the variability summary in `format`.
///
/// # Errors
///
/// Returns [`EcoliFrameError`] on serialization or I/O failure.
pub fn write_variability<W: Write>(
    writer: &mut W,
    summary: &VariabilitySummary,
    format: OutputFormat,
) -> Result<(), EcoliFrameError> {
    match format {
        OutputFormat::Csv => write_variability_csv(writer, summary),
        OutputFormat::Json => write_variability_json(writer, summary),
    }
}

/// Writes the simulation table in `format`.
///
/// # Errors
///
/// Returns [`EcoliFrameError`] on serialization or I/O failure.
pub fn write_table<W: Write>(
    writer: &mut W,
    table: &SimulationTable,
    format: OutputFormat,
) -> Result<(), EcoliFrameError> {
    match format {
        OutputFormat::Csv => write_table_csv(writer, table),
        OutputFormat::Json => write_table_json(writer, table),
    }
}

fn write_file<F>(path: &Path, write: F) -> Result<(), EcoliFrameError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), EcoliFrameError>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), "Saved output");
    Ok(())
}

/// Writes every artifact of `results` into `dir`, creating it if needed.
///
/// Returns the written paths in a fixed order: variability, table,
/// validation, summary.
///
/// # Errors
///
/// Returns [`EcoliFrameError`] if the directory cannot be created or a file
/// cannot be written.
pub fn write_results<P: AsRef<Path>>(
    dir: P,
    results: &SimulationResults,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, EcoliFrameError> {
    let dir = dir.as_ref();
    ensure_output_directory(dir)?;
    let extension = format.extension();

    let variability_path = dir.join(format!("{VARIABILITY_FILE_STEM}.{extension}"));
    write_file(&variability_path, |w| {
        write_variability(w, &results.variability, format)
    })?;

    let table_path = dir.join(format!("{TABLE_FILE_STEM}.{extension}"));
    write_file(&table_path, |w| write_table(w, &results.table, format))?;

    let validation_path = dir.join(VALIDATION_FILE_NAME);
    write_file(&validation_path, |w| {
        write_validation_json(w, &results.validation)
    })?;

    let summary_path = dir.join(SUMMARY_FILE_NAME);
    write_file(&summary_path, |w| {
        writeln!(w, "{}", results.summary_text())?;
        Ok(())
    })?;

    Ok(vec![variability_path, table_path, validation_path, summary_path])
}
