//! Format decoders and the extension-based registry.
//!
//! A decoder turns one file into a generic [`ConfigValue`] tree. The registry
//! tries decoders in registration order and the first extension match wins;
//! a file no decoder claims is a hard error, not a no-op.

use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::value::ConfigValue;

mod json;
mod toml;
mod yaml;

pub use self::json::JsonDecoder;
pub use self::toml::TomlDecoder;
pub use self::yaml::YamlDecoder;

/// A file-format decoder collaborator.
pub trait Decoder: Send + Sync + std::fmt::Debug {
    /// Short format name for diagnostics (`"yaml"`, `"json"`, ...).
    fn name(&self) -> &'static str;

    /// Whether this decoder claims the file, judged by its extension.
    fn supports(&self, path: &Path) -> bool;

    /// Decode the file into a generic tree.
    fn decode(&self, path: &Path) -> Result<ConfigValue, LoadError>;
}

/// Ordered decoder collection; first `supports` match wins.
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn Decoder>>,
}

impl DecoderRegistry {
    /// An empty registry. Useful when the caller wants full control over the
    /// decoder set.
    pub fn new() -> Self {
        Self { decoders: Vec::new() }
    }

    /// The default decoder set: YAML, JSON, TOML, in that order.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(YamlDecoder)
            .register(JsonDecoder)
            .register(TomlDecoder)
    }

    /// Append a decoder; later registrations are tried after earlier ones.
    pub fn register(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// Find the decoder that claims `path`.
    pub fn resolve(&self, path: &Path) -> Result<&dyn Decoder, LoadError> {
        for decoder in &self.decoders {
            if decoder.supports(path) {
                return Ok(decoder.as_ref());
            }
        }
        Err(LoadError::UnsupportedFormat { path: path.to_path_buf() })
    }

    /// Resolve and decode in one step.
    pub fn decode(&self, path: &Path) -> Result<ConfigValue, LoadError> {
        self.resolve(path)?.decode(path)
    }

    /// Names of the registered formats, in registration order.
    pub fn formats(&self) -> Vec<&'static str> {
        self.decoders.iter().map(|decoder| decoder.name()).collect()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// Lowercased extension, empty when absent.
pub(crate) fn extension(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase()
}

pub(crate) fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::parse(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_registry_resolves_by_extension() {
        let registry = DecoderRegistry::with_defaults();
        assert_eq!(registry.resolve(Path::new("app.yaml")).expect("yaml").name(), "yaml");
        assert_eq!(registry.resolve(Path::new("app.yml")).expect("yml").name(), "yaml");
        assert_eq!(registry.resolve(Path::new("app.json")).expect("json").name(), "json");
        assert_eq!(registry.resolve(Path::new("app.toml")).expect("toml").name(), "toml");
    }

    #[test]
    fn test_unmatched_extension_is_a_hard_error() {
        let registry = DecoderRegistry::with_defaults();
        let err = registry.resolve(Path::new("app.ini")).expect_err("should fail");
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));

        let err = registry.resolve(Path::new("noextension")).expect_err("should fail");
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_first_registered_match_wins() {
        #[derive(Debug)]
        struct Greedy;
        impl Decoder for Greedy {
            fn name(&self) -> &'static str {
                "greedy"
            }
            fn supports(&self, _path: &Path) -> bool {
                true
            }
            fn decode(&self, _path: &Path) -> Result<ConfigValue, LoadError> {
                Ok(ConfigValue::Null)
            }
        }

        let registry = DecoderRegistry::new().register(Greedy).register(YamlDecoder);
        assert_eq!(registry.resolve(Path::new("app.yaml")).expect("resolve").name(), "greedy");
    }

    #[test]
    fn test_decode_dispatches_and_parses() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.json");
        fs::write(&path, r#"{"name": "app"}"#).expect("write");

        let registry = DecoderRegistry::with_defaults();
        let value = registry.decode(&path).expect("decode");
        assert_eq!(value.get("name").and_then(ConfigValue::as_str), Some("app"));
    }

    #[test]
    fn test_formats_lists_registration_order() {
        let registry = DecoderRegistry::with_defaults();
        assert_eq!(registry.formats(), ["yaml", "json", "toml"]);
    }
}
