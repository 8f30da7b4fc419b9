//! `%parameter%` placeholder substitution.
//!
//! Substitution is best-effort by design: a token that does not resolve, or
//! whose value cannot be spliced into surrounding text, is left as literal
//! `%name%` and never raised as an error.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::value::ConfigValue;

/// Flat table of parameter names to values, insertion-ordered.
pub type ParameterTable = IndexMap<String, ConfigValue>;

// A leaf that is exactly one token gets the raw parameter value; tokens
// embedded in longer text are spliced as strings.
static FULL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%([0-9A-Za-z._-]+)%$").expect("valid placeholder regex"));
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%([0-9A-Za-z._-]+)%").expect("valid placeholder regex"));

/// Look up a token name in the parameter table.
pub fn resolve_token<'a>(name: &str, table: &'a ParameterTable) -> Option<&'a ConfigValue> {
    table.get(name)
}

/// Substitute placeholders over every string leaf of `value`.
///
/// A string that is wholly one `%name%` token takes the parameter's raw value
/// and so may change type (integer, boolean, even a structured tree). Inside
/// longer text only scalar-valued parameters are spliced; structured values
/// leave the occurrence untouched. Non-string leaves pass through unchanged.
pub fn substitute(value: ConfigValue, table: &ParameterTable) -> ConfigValue {
    match value {
        ConfigValue::String(text) => substitute_string(text, table),
        ConfigValue::Sequence(items) => {
            ConfigValue::Sequence(items.into_iter().map(|item| substitute(item, table)).collect())
        }
        ConfigValue::Mapping(map) => ConfigValue::Mapping(
            map.into_iter().map(|(key, item)| (key, substitute(item, table))).collect(),
        ),
        other => other,
    }
}

fn substitute_string(text: String, table: &ParameterTable) -> ConfigValue {
    if let Some(caps) = FULL_TOKEN.captures(&text) {
        if let Some(value) = resolve_token(&caps[1], table) {
            return value.clone();
        }
        // Unresolved full token falls through and stays literal.
    }

    let replaced = TOKEN.replace_all(&text, |caps: &Captures| {
        match resolve_token(&caps[1], table).and_then(ConfigValue::to_scalar_string) {
            Some(scalar) => scalar,
            None => caps[0].to_string(),
        }
    });
    ConfigValue::String(replaced.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, ConfigValue)]) -> ParameterTable {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_full_token_preserves_type() {
        let table = table(&[("count", ConfigValue::Int(5))]);
        let result = substitute(ConfigValue::String("%count%".into()), &table);
        assert_eq!(result, ConfigValue::Int(5));
    }

    #[test]
    fn test_full_token_may_expand_to_structure() {
        let db = ConfigValue::Mapping(
            [("host".to_string(), ConfigValue::String("localhost".into()))].into_iter().collect(),
        );
        let table = table(&[("db", db.clone())]);
        let result = substitute(ConfigValue::String("%db%".into()), &table);
        assert_eq!(result, db);
    }

    #[test]
    fn test_mixed_text_splices_scalars() {
        let table = table(&[("name", ConfigValue::String("x".into()))]);
        let result = substitute(ConfigValue::String("hello %name%!".into()), &table);
        assert_eq!(result, ConfigValue::String("hello x!".into()));
    }

    #[test]
    fn test_mixed_text_leaves_structured_values_literal() {
        let table = table(&[("name", ConfigValue::Sequence(vec![ConfigValue::Int(1)]))]);
        let result = substitute(ConfigValue::String("hello %name%!".into()), &table);
        assert_eq!(result, ConfigValue::String("hello %name%!".into()));
    }

    #[test]
    fn test_unresolved_token_stays_literal() {
        let result = substitute(ConfigValue::String("%missing%".into()), &ParameterTable::new());
        assert_eq!(result, ConfigValue::String("%missing%".into()));
    }

    #[test]
    fn test_mixed_text_stringifies_non_string_scalars() {
        let table = table(&[
            ("port", ConfigValue::Int(5432)),
            ("tls", ConfigValue::Bool(true)),
            ("tag", ConfigValue::Null),
        ]);
        let result =
            substitute(ConfigValue::String("db:%port% tls=%tls% tag=[%tag%]".into()), &table);
        assert_eq!(result, ConfigValue::String("db:5432 tls=true tag=[]".into()));
    }

    #[test]
    fn test_substitution_recurses_through_tree() {
        let table = table(&[("host", ConfigValue::String("db.local".into()))]);
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("servers:\n  - \"%host%\"\n  - other\nport: 1\n").expect("yaml");
        let result = substitute(ConfigValue::from(yaml), &table);
        let servers = result.get("servers").expect("servers");
        assert_eq!(
            servers,
            &ConfigValue::Sequence(vec![
                ConfigValue::String("db.local".into()),
                ConfigValue::String("other".into()),
            ])
        );
    }

    #[test]
    fn test_token_names_allow_dots_dashes_underscores() {
        let table = table(&[("db.primary_host-v2", ConfigValue::String("x".into()))]);
        let result = substitute(ConfigValue::String("%db.primary_host-v2%".into()), &table);
        assert_eq!(result, ConfigValue::String("x".into()));
    }

    #[test]
    fn test_resolve_token() {
        let table = table(&[("a", ConfigValue::Int(1))]);
        assert_eq!(resolve_token("a", &table), Some(&ConfigValue::Int(1)));
        assert_eq!(resolve_token("b", &table), None);
    }
}
