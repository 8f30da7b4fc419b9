//! Import directive resolution.
//!
//! An imports key may hold a single path, a sequence of paths, or `key: path`
//! pairs. Each entry resolves to an on-disk file here; the orchestrator then
//! recursively parses it. There is no cycle detection: a file that imports
//! itself recurses until the stack runs out.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::LoadError;
use crate::value::ConfigValue;

/// One normalized import: an optional nesting key and the resolved file path.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// When set, the imported document nests under this key.
    pub key: Option<String>,
    /// Resolved, existing path of the file to load.
    pub path: PathBuf,
}

static DRIVE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]:[\\/]").expect("valid drive regex"));
static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("valid scheme regex"));

/// Normalize an imports directive into resolved entries, declaration order
/// preserved.
///
/// Accepted shapes: a bare string, a sequence of bare strings and
/// `key: path` pairs, or a mapping of `key: path` pairs. Entries of any
/// other shape are skipped with a warning; they carry no path to load.
pub fn resolve_imports(
    directive: ConfigValue,
    imported_from: &Path,
) -> Result<Vec<Import>, LoadError> {
    let mut imports = Vec::new();
    match directive {
        ConfigValue::String(target) => {
            imports.push(resolve_entry(None, &target, imported_from)?);
        }
        ConfigValue::Sequence(entries) => {
            for entry in entries {
                match entry {
                    ConfigValue::String(target) => {
                        imports.push(resolve_entry(None, &target, imported_from)?);
                    }
                    ConfigValue::Mapping(pairs) => {
                        collect_keyed(&mut imports, pairs, imported_from)?;
                    }
                    other => {
                        warn!(
                            file = %imported_from.display(),
                            "skipping import entry that is neither a path nor a key: path pair: {other:?}"
                        );
                    }
                }
            }
        }
        ConfigValue::Mapping(pairs) => {
            collect_keyed(&mut imports, pairs, imported_from)?;
        }
        other => {
            warn!(
                file = %imported_from.display(),
                "imports directive is not a path, sequence, or mapping: {other:?}"
            );
        }
    }
    Ok(imports)
}

fn collect_keyed(
    imports: &mut Vec<Import>,
    pairs: indexmap::IndexMap<String, ConfigValue>,
    imported_from: &Path,
) -> Result<(), LoadError> {
    for (key, target) in pairs {
        match target {
            ConfigValue::String(target) => {
                imports.push(resolve_entry(Some(key), &target, imported_from)?);
            }
            other => {
                warn!(
                    file = %imported_from.display(),
                    key, "skipping keyed import whose target is not a path: {other:?}"
                );
            }
        }
    }
    Ok(())
}

fn resolve_entry(
    key: Option<String>,
    target: &str,
    imported_from: &Path,
) -> Result<Import, LoadError> {
    let path = resolve_path(target, imported_from);
    if path.exists() {
        Ok(Import { key, path })
    } else {
        Err(LoadError::missing_import(path, imported_from))
    }
}

/// Resolve an import target against the importing file.
///
/// Absolute-looking paths (leading separator, drive letter, or URL scheme)
/// are taken as-is when they exist; a missing absolute path falls back to
/// relative resolution against the importing file's directory, the same
/// second chance relative paths get by construction.
pub fn resolve_path(target: &str, imported_from: &Path) -> PathBuf {
    let base_dir = imported_from.parent().unwrap_or_else(|| Path::new("."));
    if is_absolute_target(target) {
        let absolute = PathBuf::from(target);
        if absolute.exists() {
            return absolute;
        }
        return base_dir.join(target);
    }
    base_dir.join(target)
}

fn is_absolute_target(target: &str) -> bool {
    target.starts_with('/')
        || target.starts_with('\\')
        || DRIVE_PREFIX.is_match(target)
        || URL_SCHEME.is_match(target)
}
