//! conflux: layered configuration loading
//!
//! Command-line front end over the load pipeline: resolve imports, merge
//! documents, substitute parameters, and print or cache the result.

use anyhow::Result;

fn main() -> Result<()> {
    conflux::cli::run()
}
