use std::io::Write;

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};

use crate::analysis::{ValidationReport, VariabilitySummary};
use crate::constants::EFFICIENCY_COLUMN_SUFFIX;
use crate::types::{CycleRecord, EcoliFrameError, SimulationTable};

/// Record view of a table: one object per cycle with one key per codon.
struct TableRecords<'a> {
    columns: Vec<String>,
    rows: &'a [CycleRecord],
}

struct RowRecord<'a> {
    columns: &'a [String],
    row: &'a CycleRecord,
}

impl Serialize for RowRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 2))?;
        map.serialize_entry("cycle", &self.row.cycle)?;
        map.serialize_entry("nutrient_level", &self.row.nutrient_level)?;
        for (column, value) in self.columns.iter().zip(&self.row.efficiencies) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl Serialize for TableRecords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&RowRecord {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

/// Writes the simulation table as a JSON array of per-cycle records.
pub fn write_table_json<W: Write>(
    writer: &mut W,
    table: &SimulationTable,
) -> Result<(), EcoliFrameError> {
    let records = TableRecords {
        columns: table
            .codon_names()
            .iter()
            .map(|codon| format!("{codon}{EFFICIENCY_COLUMN_SUFFIX}"))
            .collect(),
        rows: &table.rows,
    };
    serde_json::to_writer_pretty(&mut *writer, &records)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the variability summary as a JSON array of per-codon records.
pub fn write_variability_json<W: Write>(
    writer: &mut W,
    summary: &VariabilitySummary,
) -> Result<(), EcoliFrameError> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the validation report as a JSON object keyed by metric.
pub fn write_validation_json<W: Write>(
    writer: &mut W,
    report: &ValidationReport,
) -> Result<(), EcoliFrameError> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{MetricSet, ReferenceTable, analyze_variability, validate_simulation};
    use serde_json::Value;

    fn table() -> SimulationTable {
        SimulationTable::from_columns(
            &[1.0, 0.5],
            vec![("GAT".to_string(), vec![None, Some(0.8)])],
        )
        .unwrap()
    }

    #[test]
    fn test_write_table_json() {
        let mut buffer = Vec::new();
        write_table_json(&mut buffer, &table()).unwrap();

        let json: Value = serde_json::from_slice(&buffer).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["cycle"], 1);
        assert_eq!(rows[0]["GAT_efficiency"], Value::Null);
        assert_eq!(rows[1]["nutrient_level"], 0.5);
        assert_eq!(rows[1]["GAT_efficiency"], 0.8);
    }

    #[test]
    fn test_write_variability_and_validation_json() {
        let summary = analyze_variability(&table(), ["variance"]).unwrap();
        let mut buffer = Vec::new();
        write_variability_json(&mut buffer, &summary).unwrap();
        let json: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json[0]["codon"], "GAT");
        assert_eq!(json[0]["variance"], Value::Null);

        let report = validate_simulation(
            &summary,
            &ReferenceTable::builtin_benchmarks(),
            &MetricSet::from_names(["variance"]).unwrap(),
        );
        let mut buffer = Vec::new();
        write_validation_json(&mut buffer, &report).unwrap();
        let json: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["variance"], "Not enough data points for correlation.");
    }
}
