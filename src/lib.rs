//! conflux: layered configuration loading
//!
//! Loads application configuration from one or more structured files (YAML,
//! JSON, or TOML), resolves the import graph between them, merges the
//! documents recursively with later files winning, substitutes `%parameter%`
//! placeholders from collected parameter tables, and can persist the merged
//! result as a pre-compiled artifact tied to the freshness of its sources.

pub mod cache;
pub mod cli;
pub mod decode;
pub mod error;
pub mod imports;
pub mod loader;
pub mod merge;
pub mod options;
pub mod params;
pub mod value;

pub use cache::{ArtifactCache, FileCache};
pub use decode::{Decoder, DecoderRegistry};
pub use error::LoadError;
pub use loader::{ConfigLoader, LoadReport};
pub use options::Options;
pub use params::ParameterTable;
pub use value::ConfigValue;
