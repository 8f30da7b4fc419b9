//! Generic configuration tree
//!
//! Every decoder produces a [`ConfigValue`] and every pipeline stage consumes
//! or transforms one. Mappings preserve insertion order so merged output is
//! deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A decoded configuration tree: scalar, sequence, or string-keyed mapping.
///
/// The serde representation is untagged, so a tree serializes to (and
/// deserializes from) plain JSON or YAML with no enum wrapper. That is what
/// makes the cache artifact directly re-loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<ConfigValue>),
    Mapping(IndexMap<String, ConfigValue>),
}

impl Default for ConfigValue {
    fn default() -> Self {
        ConfigValue::Null
    }
}

impl ConfigValue {
    /// Borrow the mapping entries, if this value is a mapping.
    pub fn as_mapping(&self) -> Option<&IndexMap<String, ConfigValue>> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Mutably borrow the mapping entries, if this value is a mapping.
    pub fn as_mapping_mut(&mut self) -> Option<&mut IndexMap<String, ConfigValue>> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the string content, if this value is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a top-level mapping key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Remove and return a top-level mapping key, preserving the order of the
    /// remaining entries.
    pub fn take_key(&mut self, key: &str) -> Option<ConfigValue> {
        self.as_mapping_mut().and_then(|map| map.shift_remove(key))
    }

    /// True for null, an empty mapping, or an empty sequence.
    ///
    /// A document that is empty after its directive keys were stripped
    /// contributes nothing to the merge and is not tracked as a resource.
    pub fn is_empty(&self) -> bool {
        match self {
            ConfigValue::Null => true,
            ConfigValue::Mapping(map) => map.is_empty(),
            ConfigValue::Sequence(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Stringified form of a plain scalar, for splicing into placeholder
    /// text. Structured values have no string form and return `None`.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            ConfigValue::Null => Some(String::new()),
            ConfigValue::Bool(b) => Some(b.to_string()),
            ConfigValue::Int(n) => Some(n.to_string()),
            ConfigValue::Float(n) => Some(n.to_string()),
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Sequence(_) | ConfigValue::Mapping(_) => None,
        }
    }
}

impl From<serde_yaml::Value> for ConfigValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => ConfigValue::Null,
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(b),
            serde_yaml::Value::Number(n) => number_from_yaml(&n),
            serde_yaml::Value::String(s) => ConfigValue::String(s),
            serde_yaml::Value::Sequence(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_yaml::Value::Mapping(map) => ConfigValue::Mapping(
                map.into_iter().map(|(k, v)| (yaml_key(&k), ConfigValue::from(v))).collect(),
            ),
            // Tagged values (e.g. `!secret foo`) decode as their inner value.
            serde_yaml::Value::Tagged(tagged) => ConfigValue::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Int(i)
                } else {
                    ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(map) => ConfigValue::Mapping(
                map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect(),
            ),
        }
    }
}

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ConfigValue::String(s),
            toml::Value::Integer(i) => ConfigValue::Int(i),
            toml::Value::Float(f) => ConfigValue::Float(f),
            toml::Value::Boolean(b) => ConfigValue::Bool(b),
            // TOML datetimes have no tree counterpart; keep the literal text.
            toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            toml::Value::Table(map) => ConfigValue::Mapping(
                map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect(),
            ),
        }
    }
}

// YAML allows non-string mapping keys; the pipeline's mappings are
// string-keyed, so scalar keys are rendered to their literal form.
fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn number_from_yaml(n: &serde_yaml::Number) -> ConfigValue {
    if let Some(i) = n.as_i64() {
        ConfigValue::Int(i)
    } else {
        ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}
