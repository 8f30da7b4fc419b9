//! TOML decoder

use std::path::Path;

use crate::error::LoadError;
use crate::value::ConfigValue;

use super::{extension, read_source, Decoder};

/// Decodes `.toml` files via the `toml` crate.
#[derive(Debug)]
pub struct TomlDecoder;

impl Decoder for TomlDecoder {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn supports(&self, path: &Path) -> bool {
        extension(path) == "toml"
    }

    fn decode(&self, path: &Path) -> Result<ConfigValue, LoadError> {
        let content = read_source(path)?;
        let raw: toml::Value = toml::from_str(&content).map_err(|e| LoadError::parse(path, e))?;
        Ok(ConfigValue::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_decodes_document() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.toml");
        fs::write(&path, "[server]\nport = 8080\nhosts = [\"a\", \"b\"]\n").expect("write");

        let value = TomlDecoder.decode(&path).expect("decode");
        let server = value.get("server").expect("server table");
        assert_eq!(server.get("port"), Some(&ConfigValue::Int(8080)));
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "port = \n").expect("write");

        let err = TomlDecoder.decode(&path).expect_err("should fail");
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
