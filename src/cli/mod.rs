//! Command-line interface for conflux
//!
//! Provides `render` and `info` subcommands over the load pipeline.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::options::Options;

mod info;
mod render;

/// Load layered configuration files with imports, merging, and %parameter% substitution
#[derive(Parser)]
#[command(name = "conflux")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a configuration file and print the merged tree
    Render(render::RenderArgs),

    /// Display the sources, parameters, and formats behind a configuration
    Info(info::InfoArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Render(args) => render::run(args),
        Commands::Info(args) => info::run(args),
    }
}

/// Pipeline flags shared by both subcommands.
#[derive(Args)]
struct PipelineArgs {
    /// Skip import directives
    #[arg(long)]
    no_imports: bool,

    /// Skip parameter collection and placeholder substitution
    #[arg(long)]
    no_parameters: bool,

    /// Name of the import directive key
    #[arg(long, value_name = "KEY", default_value = "imports")]
    imports_key: String,

    /// Name of the parameters directive key
    #[arg(long, value_name = "KEY", default_value = "parameters")]
    parameters_key: String,
}

impl PipelineArgs {
    fn to_options(&self) -> Options {
        Options::default()
            .with_imports_key(self.imports_key.clone())
            .with_parameters_key(self.parameters_key.clone())
            .process_imports(!self.no_imports)
            .process_parameters(!self.no_parameters)
    }
}
