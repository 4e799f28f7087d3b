use std::io::Write;

use crate::analysis::VariabilitySummary;
use crate::constants::EFFICIENCY_COLUMN_SUFFIX;
use crate::types::{EcoliFrameError, SimulationTable};

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes the variability summary as `codon,<metric>...` rows.
pub fn write_variability_csv<W: Write>(
    writer: &mut W,
    summary: &VariabilitySummary,
) -> Result<(), EcoliFrameError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(summary.column_names())?;
    for row in &summary.rows {
        let record = std::iter::once(row.codon.clone()).chain(row.values.iter().copied().map(cell));
        csv_writer.write_record(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the simulation table as `cycle,nutrient_level,<codon>_efficiency...`
/// rows; missing efficiencies become empty fields.
pub fn write_table_csv<W: Write>(
    writer: &mut W,
    table: &SimulationTable,
) -> Result<(), EcoliFrameError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let header = ["cycle".to_string(), "nutrient_level".to_string()]
        .into_iter()
        .chain(
            table
                .codon_names()
                .iter()
                .map(|codon| format!("{codon}{EFFICIENCY_COLUMN_SUFFIX}")),
        );
    csv_writer.write_record(header)?;
    for row in &table.rows {
        let record = [row.cycle.to_string(), row.nutrient_level.to_string()]
            .into_iter()
            .chain(row.efficiencies.iter().copied().map(cell));
        csv_writer.write_record(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
