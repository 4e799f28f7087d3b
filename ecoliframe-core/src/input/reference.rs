use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info};

use crate::analysis::{Metric, ReferenceTable};
use crate::constants::CODON_COLUMN;
use crate::types::EcoliFrameError;

/// Reads a reference table from CSV.
///
/// The header must contain a `codon` column. Columns named after a metric
/// (`variance`, `Fano_factor`, `CV`, `CRI`) are loaded; any other column is
/// ignored. Empty cells and `NaN` are missing values.
///
/// # Errors
///
/// Returns [`EcoliFrameError::Schema`] if the `codon` column is absent or a
/// codon repeats, [`EcoliFrameError::ParseError`] for a non-numeric cell, and
/// [`EcoliFrameError::CsvError`] on malformed CSV.
pub fn read_reference_table<R: Read>(reader: R) -> Result<ReferenceTable, EcoliFrameError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let codon_column = headers
        .iter()
        .position(|name| name == CODON_COLUMN)
        .ok_or_else(|| {
            EcoliFrameError::Schema(format!("reference table has no '{CODON_COLUMN}' column"))
        })?;
    let metric_columns: Vec<(usize, Metric)> = headers
        .iter()
        .enumerate()
        .filter_map(|(column, name)| Metric::from_name(name).map(|metric| (column, metric)))
        .collect();

    let mut codons = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); metric_columns.len()];
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        codons.push(record.get(codon_column).unwrap_or_default().to_string());
        for ((column, metric), target) in metric_columns.iter().zip(values.iter_mut()) {
            target.push(parse_cell(record.get(*column).unwrap_or_default(), *metric, line + 2)?);
        }
    }

    let mut table = ReferenceTable::new(codons)?;
    for ((_, metric), column) in metric_columns.into_iter().zip(values) {
        table = table.with_column(metric, column)?;
    }
    debug!(
        codons = table.len(),
        metrics = table.metrics().count(),
        "Parsed reference table"
    );
    Ok(table)
}

/// Reads a reference table from a CSV file.
///
/// # Errors
///
/// Returns [`EcoliFrameError::IoError`] if the file cannot be opened, otherwise
/// the errors of [`read_reference_table`].
pub fn read_reference_file<P: AsRef<Path>>(path: P) -> Result<ReferenceTable, EcoliFrameError> {
    let file = File::open(path.as_ref())?;
    let table = read_reference_table(BufReader::new(file))?;
    info!(path = %path.as_ref().display(), codons = table.len(), "Loaded reference data");
    Ok(table)
}

fn parse_cell(cell: &str, metric: Metric, line: usize) -> Result<Option<f64>, EcoliFrameError> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        EcoliFrameError::ParseError(format!(
            "line {line}: '{cell}' is not a number in column '{metric}'"
        ))
    })
}
