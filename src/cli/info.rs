//! Info command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::loader::ConfigLoader;

use super::PipelineArgs;

#[derive(Args)]
pub struct InfoArgs {
    /// Configuration file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let loader = ConfigLoader::new().with_options(args.pipeline.to_options());
    let report = loader
        .load_report(&args.file)
        .with_context(|| format!("Failed loading configuration: {}", args.file.display()))?;

    println!("Configuration: {}", args.file.display());
    println!("Formats supported: {}", loader.registry().formats().join(", "));

    println!("Source files:");
    for resource in &report.resources {
        println!("  {}", resource.display());
    }

    if !report.parameters.is_empty() {
        println!("Parameters:");
        for (name, value) in &report.parameters {
            match value.to_scalar_string() {
                Some(scalar) => println!("  {} = {}", name, scalar),
                None => println!("  {} = <structured>", name),
            }
        }
    }

    if let Some(map) = report.config.as_mapping() {
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        println!("Top-level keys: {}", keys.join(", "));
    }

    Ok(())
}
