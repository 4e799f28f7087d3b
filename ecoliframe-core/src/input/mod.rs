//! Loading of configuration files and reference benchmark tables.

pub mod config_file;
pub mod reference;

pub use reference::{read_reference_file, read_reference_table};
