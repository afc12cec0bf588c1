//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Cost-of-quality tree editor: nested cost lines, roll-up totals, profit and margin
#[derive(Parser, Debug)]
#[command(name = "costtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr (repeat for more: -d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(long, global = true, value_hint = ValueHint::FilePath, env = "COSTTREE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit a cost tree interactively (default)
    Session {
        /// Income used for profit and margin
        #[arg(long, allow_hyphen_values = true)]
        income: Option<String>,
    },

    /// Apply editor commands from a file ('-' reads stdin)
    Run {
        /// Script with one editor command per line
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Income used for profit and margin
        #[arg(long, allow_hyphen_values = true)]
        income: Option<String>,
        /// Do not print the final tree and summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// List cost-of-quality categories
    Categories,

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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
