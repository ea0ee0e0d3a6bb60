//! skillchain CLI entry point.
//!
//! This binary is the composition root:
//!
//! 1. **Parse flags** with `clap`.
//! 2. **Wire observability**: `tracing-subscriber` with a text or JSON layer.
//!    All `tracing` events emitted by the `pipeline` and `skills` crates flow
//!    through it.
//! 3. **Load the pipeline config**, read the raw service response, rebuild
//!    the output tree, and print or query it.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
