//! Render command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cache::FileCache;
use crate::loader::ConfigLoader;
use crate::value::ConfigValue;

use super::PipelineArgs;

#[derive(Args)]
pub struct RenderArgs {
    /// Configuration file to load
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format: yaml, json, or toml
    #[arg(short, long, value_name = "FORMAT", default_value = "yaml")]
    pub format: String,

    /// Reuse or write a compiled artifact at this path
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let format = args.format.to_lowercase();
    if !matches!(format.as_str(), "yaml" | "json" | "toml") {
        anyhow::bail!("Invalid output format '{}' (expected yaml, json, or toml)", args.format);
    }

    let mut loader = ConfigLoader::new().with_options(args.pipeline.to_options());
    if let Some(artifact) = &args.cache {
        loader = loader.with_cache(FileCache::new(artifact));
    }

    let config = loader
        .load(&args.file)
        .with_context(|| format!("Failed loading configuration: {}", args.file.display()))?;

    print!("{}", serialize(&config, &format)?);
    Ok(())
}

fn serialize(config: &ConfigValue, format: &str) -> Result<String> {
    match format {
        "yaml" => serde_yaml::to_string(config).context("Failed to render YAML"),
        "json" => {
            let mut text =
                serde_json::to_string_pretty(config).context("Failed to render JSON")?;
            text.push('\n');
            Ok(text)
        }
        "toml" => {
            if config.as_mapping().is_none() {
                anyhow::bail!("TOML output requires a mapping at the top level");
            }
            toml::to_string_pretty(config).context("Failed to render TOML")
        }
        other => anyhow::bail!("Invalid output format '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ConfigValue {
        ConfigValue::from(serde_yaml::from_str::<serde_yaml::Value>(yaml).expect("yaml"))
    }

    #[test]
    fn test_serialize_yaml() {
        let text = serialize(&parse("name: app\nport: 8080\n"), "yaml").expect("yaml");
        assert_eq!(text, "name: app\nport: 8080\n");
    }

    #[test]
    fn test_serialize_json_is_pretty() {
        let text = serialize(&parse("name: app\n"), "json").expect("json");
        assert!(text.contains("\"name\": \"app\""));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_serialize_toml_rejects_non_mapping_root() {
        let err = serialize(&parse("- 1\n- 2\n"), "toml").expect_err("should fail");
        assert!(err.to_string().contains("mapping"));
    }
}
