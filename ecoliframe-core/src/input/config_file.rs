use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::config::SimulationConfig;
use crate::types::EcoliFrameError;

impl SimulationConfig {
    /// Loads a configuration from a flat JSON object. Missing keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::IoError`] if the file cannot be opened and
    /// [`EcoliFrameError::JsonError`] if it is not a valid configuration.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EcoliFrameError> {
        let file = File::open(path.as_ref())?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        debug!(path = %path.as_ref().display(), "Loaded JSON configuration");
        Ok(config)
    }

    /// Loads a configuration from `key,value` rows; list values are comma
    /// separated inside a quoted field. Rows without exactly two fields are
    /// skipped, as is an optional `key,value` header.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::IoError`] or [`EcoliFrameError::CsvError`] on
    /// read failures and [`EcoliFrameError::ParseError`] for unknown keys or
    /// unparsable values.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, EcoliFrameError> {
        let file = File::open(path.as_ref())?;
        let config = Self::from_csv_reader(BufReader::new(file))?;
        debug!(path = %path.as_ref().display(), "Loaded CSV configuration");
        Ok(config)
    }

    /// [`SimulationConfig::from_csv_file`] over any reader.
    ///
    /// # Errors
    ///
    /// See [`SimulationConfig::from_csv_file`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, EcoliFrameError> {
        let mut config = Self::default();
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        for record in rows.records() {
            let record = record?;
            if record.len() != 2 || &record[0] == "key" {
                continue;
            }
            config.apply_override(&record[0], &record[1])?;
        }
        Ok(config)
    }

    /// Loads a configuration file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`EcoliFrameError::InvalidInput`] for extensions other than
    /// `.json` and `.csv`, otherwise the errors of the format loader.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EcoliFrameError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::from_csv_file(path),
            _ => Err(EcoliFrameError::InvalidInput(format!(
                "unsupported configuration file '{}'; expected .json or .csv",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecayKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_reader_overrides_defaults() {
        let data = "key,value\nnum_cycles,200\nnutrient_levels,\"1.0,0.5,0.2\"\nrobust_codons,\"AAA, GGC\"\ndecay_model,linear\nnot,a,pair\n";
        let config = SimulationConfig::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(config.num_cycles, 200);
        assert_eq!(config.nutrient_levels, vec![1.0, 0.5, 0.2]);
        assert_eq!(config.robust_codons, vec!["AAA", "GGC"]);
        assert_eq!(config.decay.kind, DecayKind::Linear);
        assert_eq!(config.sensitive_codons, vec!["CGT", "CTG"]);
    }

    #[test]
    fn test_csv_reader_unknown_key() {
        let err = SimulationConfig::from_csv_reader("speed,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, EcoliFrameError::ParseError(_)));
    }

    #[test]
    fn test_from_file_dispatch() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"num_cycles": 12, "seed": 5}}"#).unwrap();
        let config = SimulationConfig::from_file(json.path()).unwrap();
        assert_eq!(config.num_cycles, 12);
        assert_eq!(config.seed, Some(5));

        let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(csv, "stress_probability,0.3").unwrap();
        let config = SimulationConfig::from_file(csv.path()).unwrap();
        assert_eq!(config.stress.stress_probability, 0.3);

        let other = NamedTempFile::new().unwrap();
        assert!(matches!(
            SimulationConfig::from_file(other.path()),
            Err(EcoliFrameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"num_cycles": "lots"}}"#).unwrap();
        assert!(matches!(
            SimulationConfig::from_json_file(json.path()),
            Err(EcoliFrameError::JsonError(_))
        ));
    }
}
