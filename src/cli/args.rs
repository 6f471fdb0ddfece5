//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite CMS-rendered HTML into AMP markup
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: ampify.toml, optional)
    #[arg(short = 'C', long, global = true, default_value = "ampify.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Transform HTML documents
    #[command(visible_alias = "t")]
    Transform {
        #[command(flatten)]
        args: TransformArgs,
    },

    /// Print the default configuration
    #[command(visible_alias = "c")]
    Config,
}

/// Transform command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct TransformArgs {
    /// HTML files to transform. Use `-` to read a document from stdin.
    #[arg(value_name = "INPUT", required = true, value_hint = clap::ValueHint::FilePath)]
    pub inputs: Vec<PathBuf>,

    /// Write results into this directory instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Emit the original markup for any document that collected errors
    #[arg(long)]
    pub strict: bool,

    /// Write collected errors as JSON to this file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub report: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transform() {
        let cli = Cli::parse_from([
            "ampify", "transform", "a.html", "b.html", "-o", "out", "--strict", "--report",
            "r.json",
        ]);
        assert_eq!(cli.config, PathBuf::from("ampify.toml"));
        let Commands::Transform { args } = cli.command else {
            panic!("expected transform");
        };
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(args.strict);
        assert!(!args.verbose);
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::parse_from(["ampify", "config", "-C", "site/amp.toml"]);
        assert!(matches!(cli.command, Commands::Config));
        assert_eq!(cli.config, PathBuf::from("site/amp.toml"));
    }

    #[test]
    fn test_transform_requires_input() {
        assert!(Cli::try_parse_from(["ampify", "transform"]).is_err());
    }
}
