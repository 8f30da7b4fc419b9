//! Load orchestrator
//!
//! Drives parse → import → merge → parameter extraction → placeholder
//! substitution, in that order, and owns the state accumulated along the way.
//! All per-call state lives in a [`LoadContext`] built fresh for every load,
//! so one [`ConfigLoader`] is safely reusable across sequential loads.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::cache::ArtifactCache;
use crate::decode::DecoderRegistry;
use crate::error::LoadError;
use crate::imports;
use crate::merge;
use crate::options::Options;
use crate::params::{self, ParameterTable};
use crate::value::ConfigValue;

/// Everything one load produced: the merged tree, the parameter table it was
/// substituted against, and the source files it touched.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Final merged, substituted configuration tree.
    pub config: ConfigValue,
    /// Parameters collected across all processed files.
    pub parameters: ParameterTable,
    /// Distinct source paths, in first-touched order. Handed to the cache for
    /// freshness tracking.
    pub resources: Vec<PathBuf>,
}

// Scratch state for one top-level load call.
struct LoadContext {
    configurations: Vec<ConfigValue>,
    parameters: ParameterTable,
    resources: Vec<PathBuf>,
}

impl LoadContext {
    fn new() -> Self {
        Self {
            configurations: Vec::new(),
            parameters: ParameterTable::new(),
            resources: Vec::new(),
        }
    }

    // Right-biased merge of a parameters subtree into the table.
    fn merge_parameters(&mut self, parameters: ConfigValue) {
        match parameters {
            ConfigValue::Mapping(map) => {
                for (name, value) in map {
                    let merged = match self.parameters.shift_remove(&name) {
                        Some(existing) => merge::deep_merge(existing, value),
                        None => value,
                    };
                    self.parameters.insert(name, merged);
                }
            }
            other => {
                warn!("parameters directive is not a mapping, ignoring: {other:?}");
            }
        }
    }

    fn record_resource(&mut self, path: &Path) {
        if !self.resources.iter().any(|known| known == path) {
            self.resources.push(path.to_path_buf());
        }
    }
}

/// Cache-aware configuration loader.
///
/// # Example
///
/// ```no_run
/// use conflux::{ConfigLoader, Options};
///
/// # fn main() -> Result<(), conflux::LoadError> {
/// let loader = ConfigLoader::new().with_options(Options::default());
/// let config = loader.load("config.yaml")?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    options: Options,
    registry: OnceCell<DecoderRegistry>,
    cache: Option<Box<dyn ArtifactCache>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader with default options, the default decoder set, and no cache.
    pub fn new() -> Self {
        Self {
            options: Options::default(),
            registry: OnceCell::new(),
            cache: None,
        }
    }

    /// Replace the pipeline options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Attach a cache gate.
    pub fn with_cache(mut self, cache: impl ArtifactCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Replace the decoder registry.
    pub fn with_registry(mut self, registry: DecoderRegistry) -> Self {
        self.registry = OnceCell::with_value(registry);
        self
    }

    /// The active pipeline options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The configured cache gate, if any.
    pub fn cache(&self) -> Option<&dyn ArtifactCache> {
        self.cache.as_deref()
    }

    /// The decoder registry, built on first use and reused across loads.
    pub fn registry(&self) -> &DecoderRegistry {
        self.registry.get_or_init(DecoderRegistry::with_defaults)
    }

    /// Load a configuration file, honoring the cache gate.
    ///
    /// On a fresh cache the persisted artifact is returned directly: no file
    /// is decoded and no placeholder pass runs, because the artifact was
    /// written fully resolved. On a miss the full pipeline runs and its
    /// result is persisted before being returned.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ConfigValue, LoadError> {
        let path = path.as_ref();
        if let Some(cache) = &self.cache {
            if cache.is_fresh() {
                debug!(artifact = %cache.path().display(), "cache fresh, reusing artifact");
                return cache.read();
            }
        }

        let report = self.load_report(path)?;
        if let Some(cache) = &self.cache {
            cache.write(&report.config, &report.resources)?;
        }
        Ok(report.config)
    }

    /// Run the full pipeline, bypassing the cache entirely.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ConfigValue, LoadError> {
        self.load_report(path.as_ref()).map(|report| report.config)
    }

    /// Run the full pipeline and return the merged tree together with the
    /// collected parameters and touched source files.
    pub fn load_report(&self, path: impl AsRef<Path>) -> Result<LoadReport, LoadError> {
        let path = path.as_ref();
        let mut ctx = LoadContext::new();
        self.parse_file(&mut ctx, path, None)?;

        let mut merged = merge::merge_documents(std::mem::take(&mut ctx.configurations))?;

        if self.options.process_parameters {
            // A parameters subtree can survive into the merged tree when a
            // keyed import nests one; it is a directive, not content.
            if let Some(parameters) = merged.take_key(&self.options.parameters_key) {
                let parameters = params::substitute(parameters, &ctx.parameters);
                ctx.merge_parameters(parameters);
            }
            merged = params::substitute(merged, &ctx.parameters);
        }

        Ok(LoadReport {
            config: merged,
            parameters: ctx.parameters,
            resources: ctx.resources,
        })
    }

    // One file through decode, parameter extraction, and import recursion.
    // `wrap_key` nests a keyed import's document under its key.
    fn parse_file(
        &self,
        ctx: &mut LoadContext,
        path: &Path,
        wrap_key: Option<String>,
    ) -> Result<(), LoadError> {
        debug!(path = %path.display(), "parsing configuration file");
        let mut document = self.registry().decode(path)?;

        // Parameters first: values declared here must be visible to the
        // placeholder passes of everything processed after this point.
        if self.options.process_parameters {
            if let Some(parameters) = document.take_key(&self.options.parameters_key) {
                let parameters = params::substitute(parameters, &ctx.parameters);
                ctx.merge_parameters(parameters);
            }
        }

        if self.options.process_imports {
            if let Some(directive) = document.take_key(&self.options.imports_key) {
                for import in imports::resolve_imports(directive, path)? {
                    self.parse_file(ctx, &import.path, import.key)?;
                }
            }
        }

        // Imports recurse before this append, so an importing file always
        // lands after (and thus overrides) everything it imports.
        if !document.is_empty() {
            let document = match wrap_key {
                Some(key) => {
                    let mut wrapped = indexmap::IndexMap::new();
                    wrapped.insert(key, document);
                    ConfigValue::Mapping(wrapped)
                }
                None => document,
            };
            ctx.configurations.push(document);
            ctx.record_resource(path);
        }

        Ok(())
    }
}
