//! doctools - tooling for the tutorial docs.
//!
//! - `render`: TikZ sources to PNG, gated by content-hash markers
//! - `serve`: static preview of the built HTML
//! - `authors`: Beamer author frames from AUTHORS
//! - `doctor`: environment checks

mod authors;
mod cli;
mod config;
mod core;
mod diagram;
mod doctor;
mod freshness;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::DocsConfig;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    if let Err(e) = run(&cli) {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Ctrl+C handler before any blocking work
    core::init()?;

    let config = DocsConfig::load(cli)?;

    match &cli.command {
        Commands::Render { args } => cli::render::run_render(args, &config),
        Commands::Serve { .. } => cli::serve::serve(&config.serve),
        Commands::Authors { .. } => cli::authors::run_authors(&config.authors),
        Commands::Doctor => cli::doctor::run_doctor(&config.doctor),
    }
}
