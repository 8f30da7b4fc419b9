//! Per-load pipeline options.

/// Recognized directive keys and processing toggles for one load.
///
/// Supplied once when the loader is built and read throughout a load; never
/// mutated mid-pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Mapping key holding the import directive.
    pub imports_key: String,
    /// Mapping key holding the parameters directive.
    pub parameters_key: String,
    /// Resolve and recursively load import directives.
    pub process_imports: bool,
    /// Collect parameters and substitute `%name%` placeholders.
    pub process_parameters: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            imports_key: "imports".to_string(),
            parameters_key: "parameters".to_string(),
            process_imports: true,
            process_parameters: true,
        }
    }
}

impl Options {
    /// Rename the import directive key.
    pub fn with_imports_key(mut self, key: impl Into<String>) -> Self {
        self.imports_key = key.into();
        self
    }

    /// Rename the parameters directive key.
    pub fn with_parameters_key(mut self, key: impl Into<String>) -> Self {
        self.parameters_key = key.into();
        self
    }

    /// Enable or disable import processing.
    pub fn process_imports(mut self, enabled: bool) -> Self {
        self.process_imports = enabled;
        self
    }

    /// Enable or disable parameter processing.
    pub fn process_parameters(mut self, enabled: bool) -> Self {
        self.process_parameters = enabled;
        self
    }
}
