//! landeval CLI — land-listing evaluation pipeline.
//!
//! Splits a selected master-dataset record into per-segment extracts,
//! runs the external analysis engine over them, and delivers a report
//! artifact (styled HTML, or Markdown fallback).

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
