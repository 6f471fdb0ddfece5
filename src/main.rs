//! ampify - AMP markup transformer.

use ampify::cli::{self, Cli, Commands};
use ampify::config::AmpifyConfig;
use ampify::logger;
use anyhow::Result;
use clap::{ColorChoice, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Transform { args } => {
            logger::set_verbose(args.verbose);
            let config = AmpifyConfig::load(&cli.config)?;
            cli::transform::run_transform(args, &config)
        }
        Commands::Config => cli::print_config(),
    }
}
