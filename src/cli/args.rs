//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::application::OutputFormat;
use crate::domain::Outcome;

/// Probability tree builder: fan out outcomes over repeated trials and draw the result
#[derive(Parser, Debug)]
#[command(name = "probtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (layered over the global one)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Defaults to `interactive`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask for event, outcomes and trials, then draw the tree
    Interactive {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build a tree from command-line arguments
    Build {
        /// Event name (root label)
        #[arg(short, long)]
        event: String,

        /// Outcome as NAME=PROBABILITY, repeatable, order is kept
        #[arg(short = 'o', long = "outcome", required = true, value_name = "NAME=PROB")]
        outcomes: Vec<Outcome>,

        /// Number of times the event occurs
        #[arg(short, long)]
        trials: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format (default: from file extension, then settings)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the diagram to a file instead of stdout
    #[arg(long = "output", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Print node count and total probability per depth
    #[arg(short, long)]
    pub summary: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create global config template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
