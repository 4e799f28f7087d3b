//! # EcoliFrame CLI - Codon Translation Simulator
//!
//! Command-line front end for the ecoliframe simulation pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Default run, results in ./results
//! ecoliframe
//!
//! # Reproducible run with a harsher environment
//! ecoliframe -n 5000 --stress-probability 0.3 --seed 42
//!
//! # Parameters from a file, overridden on the command line
//! ecoliframe -c params.json --rnase-activity 0.1 -o out -f json
//!
//! # Validate against measured data, eight replicates on four threads
//! ecoliframe -r benchmarks.csv --replicates 8 -t 4
//! ```
//!
//! ## Options
//!
//! - `-c, --config <FILE>`: JSON or CSV parameter file
//! - `-n, --cycles <N>`: Number of simulated cycles (default: 1000)
//! - `--nutrient-levels <LIST>`: Comma-separated, strictly decreasing levels
//! - `--robust <LIST>` / `--sensitive <LIST>`: Codon panels
//! - `--stress-probability`, `--recovery-probability <P>`: Walk probabilities
//! - `--rnase-activity`, `--decay-variability <R>`: Decay rates
//! - `--decay-model <MODEL>`: exponential or linear
//! - `--transition-mode <MODE>`: independent or exclusive
//! - `--metrics <LIST>`: Subset of variance, Fano_factor, CV, CRI
//! - `--order <ORDER>`: stress_then_translate or translate_then_stress
//! - `--seed <N>`: Seed for the random source
//! - `-r, --reference <FILE>`: Reference CSV (default: built-in benchmarks)
//! - `-o, --output-dir <DIR>`: Output directory (default: results)
//! - `-f, --format <FORMAT>`: csv or json (default: csv)
//! - `--replicates <N>`: Independent runs with seeds `seed + i`
//! - `-t, --threads <N>`: Worker threads for replicates
//! - `--normalize-trace`: Min-max normalize exported efficiency columns
//! - `-q, --quiet`: Only log warnings and errors
//!
//! Precedence is command line, then configuration file, then defaults.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use ecoliframe_core::analysis::{ReferenceTable, normalize_table};
use ecoliframe_core::config::{OutputFormat, SimulationConfig};
use ecoliframe_core::input::read_reference_file;
use ecoliframe_core::output::write_results;
use ecoliframe_core::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line flags that map one-to-one onto configuration keys.
const CONFIG_FLAGS: &[(&str, &str)] = &[
    ("cycles", "num_cycles"),
    ("nutrient-levels", "nutrient_levels"),
    ("robust", "robust_codons"),
    ("sensitive", "sensitive_codons"),
    ("stress-probability", "stress_probability"),
    ("recovery-probability", "recovery_probability"),
    ("rnase-activity", "rnase_activity"),
    ("decay-variability", "decay_variability"),
    ("decay-model", "decay_model"),
    ("transition-mode", "transition_mode"),
    ("metrics", "metrics"),
    ("order", "pipeline_order"),
    ("seed", "seed"),
    ("threads", "num_threads"),
];

fn cli() -> Command {
    Command::new("ecoliframe")
        .version(constants::VERSION)
        .about("Codon translation efficiency under nutrient stress and RNA decay")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("JSON or CSV parameter file"),
        )
        .arg(
            Arg::new("cycles")
                .short('n')
                .long("cycles")
                .value_name("N")
                .help("Number of simulated cycles"),
        )
        .arg(
            Arg::new("nutrient-levels")
                .long("nutrient-levels")
                .value_name("LIST")
                .value_delimiter(',')
                .help("Strictly decreasing nutrient levels"),
        )
        .arg(
            Arg::new("robust")
                .long("robust")
                .value_name("LIST")
                .value_delimiter(',')
                .help("Robust codons"),
        )
        .arg(
            Arg::new("sensitive")
                .long("sensitive")
                .value_name("LIST")
                .value_delimiter(',')
                .help("Nutrient-sensitive codons"),
        )
        .arg(
            Arg::new("stress-probability")
                .long("stress-probability")
                .value_name("P")
                .help("Probability of dropping one nutrient level per cycle"),
        )
        .arg(
            Arg::new("recovery-probability")
                .long("recovery-probability")
                .value_name("P")
                .help("Probability of recovering one nutrient level per cycle"),
        )
        .arg(
            Arg::new("rnase-activity")
                .long("rnase-activity")
                .value_name("R")
                .help("Baseline RNase degradation rate"),
        )
        .arg(
            Arg::new("decay-variability")
                .long("decay-variability")
                .value_name("R")
                .help("Nutrient-dependent spread of the decay rate"),
        )
        .arg(
            Arg::new("decay-model")
                .long("decay-model")
                .value_name("MODEL")
                .value_parser(["exponential", "linear"])
                .help("Shape of the decay factor"),
        )
        .arg(
            Arg::new("transition-mode")
                .long("transition-mode")
                .value_name("MODE")
                .value_parser(["independent", "exclusive"])
                .help("How stress and recovery trials combine"),
        )
        .arg(
            Arg::new("metrics")
                .long("metrics")
                .value_name("LIST")
                .value_delimiter(',')
                .help("Variability metrics: variance, Fano_factor, CV, CRI"),
        )
        .arg(
            Arg::new("order")
                .long("order")
                .value_name("ORDER")
                .value_parser(["stress_then_translate", "translate_then_stress"])
                .help("Order of the stress and translation stages"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .help("Seed for the random source"),
        )
        .arg(
            Arg::new("reference")
                .short('r')
                .long("reference")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Reference CSV keyed by codon (default: built-in benchmarks)"),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .default_value("results")
                .help("Output directory"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .value_parser(["csv", "json"])
                .default_value("csv")
                .help("Format of tabular outputs"),
        )
        .arg(
            Arg::new("replicates")
                .long("replicates")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("Number of independent replicate runs"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("N")
                .help("Worker threads for replicate runs"),
        )
        .arg(
            Arg::new("normalize-trace")
                .long("normalize-trace")
                .action(ArgAction::SetTrue)
                .help("Min-max normalize exported efficiency columns"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Quiet mode"),
        )
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the configuration file, then command-line overrides.
fn build_config(matches: &ArgMatches) -> Result<SimulationConfig, EcoliFrameError> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };
    for (flag, key) in CONFIG_FLAGS {
        if let Some(values) = matches.get_many::<String>(flag) {
            let joined = values.map(String::as_str).collect::<Vec<_>>().join(",");
            config.apply_override(key, &joined)?;
        }
    }
    config.validate()?;
    Ok(config)
}

/// Main entry point for the ecoliframe CLI.
///
/// Builds the configuration, runs the simulation (or its replicates), and
/// writes every artifact to the output directory.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();
    let quiet = matches.get_flag("quiet");
    init_logging(quiet);

    let config = build_config(&matches)?;
    let reference = match matches.get_one::<PathBuf>("reference") {
        Some(path) => read_reference_file(path)?,
        None => ReferenceTable::builtin_benchmarks(),
    };
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Csv,
    };
    let output_dir = matches
        .get_one::<PathBuf>("output-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("results"));
    let replicates = matches.get_one::<usize>("replicates").copied().unwrap_or(1);
    let normalize = matches.get_flag("normalize-trace");

    let analyzer = EcoliFrameAnalyzer::new(config);
    let runs = if replicates == 1 {
        vec![analyzer.run(&reference)?]
    } else {
        analyzer.run_replicates(replicates, &reference)?
    };

    for mut results in runs {
        let dir = if replicates == 1 {
            output_dir.clone()
        } else {
            output_dir.join(format!("replicate_{:03}", results.run_info.replicate + 1))
        };
        if normalize {
            results.table = normalize_table(&results.table);
        }
        write_results(&dir, &results, format)?;
        if !quiet {
            println!("{}", results.summary_text());
        }
    }

    info!(
        replicates,
        output_dir = %output_dir.display(),
        "Simulation complete"
    );
    Ok(())
}
