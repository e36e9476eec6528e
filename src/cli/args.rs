//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Tooling for the tutorial docs: TikZ rendering, dev server, slides, environment checks
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "doctools.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render TikZ sources to PNG, skipping unchanged ones
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Serve the built HTML tree for local preview
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory to serve (default: build/html)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        root: Option<PathBuf>,
    },

    /// Generate the Beamer author frames from an AUTHORS file
    #[command(visible_alias = "a")]
    Authors {
        /// AUTHORS file to read
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,

        /// Output .tex file
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Authors per frame
        #[arg(short, long)]
        batch: Option<usize>,
    },

    /// Check that the tools and packages the tutorial needs are installed
    #[command(visible_alias = "d")]
    Doctor,
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Source files or directories. If omitted, renders `diagram.dirs`.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Ignore cache markers and render everything
    #[arg(short, long)]
    pub force: bool,

    /// Only report which sources are out of date
    #[arg(short, long, conflicts_with = "force")]
    pub status: bool,

    /// Abort a render when a tool fails (overrides `diagram.strict`)
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub strict: Option<bool>,
}
