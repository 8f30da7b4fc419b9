//! JSON decoder

use std::path::Path;

use crate::error::LoadError;
use crate::value::ConfigValue;

use super::{extension, read_source, Decoder};

/// Decodes `.json` files via `serde_json`.
#[derive(Debug)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supports(&self, path: &Path) -> bool {
        extension(path) == "json"
    }

    fn decode(&self, path: &Path) -> Result<ConfigValue, LoadError> {
        let content = read_source(path)?;
        // Deserialize straight into the tree; the untagged representation
        // keeps object key order without a preserve-order detour.
        serde_json::from_str(&content).map_err(|e| LoadError::parse(path, e))
    }
}
