//! YAML decoder

use std::path::Path;

use crate::error::LoadError;
use crate::value::ConfigValue;

use super::{extension, read_source, Decoder};

/// Decodes `.yaml`/`.yml` files via `serde_yaml`.
#[derive(Debug)]
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn supports(&self, path: &Path) -> bool {
        matches!(extension(path).as_str(), "yaml" | "yml")
    }

    fn decode(&self, path: &Path) -> Result<ConfigValue, LoadError> {
        let content = read_source(path)?;
        // Parse to the generic value first so the tree keeps document order
        // and scalar types instead of forcing a schema.
        let raw: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| LoadError::parse(path, e))?;
        Ok(ConfigValue::from(raw))
    }
}
