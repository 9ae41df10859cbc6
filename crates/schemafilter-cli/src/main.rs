//! schemafilter CLI
//!
//! Applies a filter specification to a fixture of news items.

use clap::Parser;
use schemafilter_cli::{execute, init_logging, render_json, render_text, Cli, OutputFormat};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the rendered outcome.
    init_logging(cli.log_level)?;

    let outcome = execute(&cli)?;
    match cli.format {
        OutputFormat::Text => print!("{}", render_text(&outcome)),
        OutputFormat::Json => println!("{}", render_json(&outcome)?),
    }

    Ok(())
}
