//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Mentorship lineage forests: show family trees built from member records
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one family tree
    Tree {
        /// Members JSON file (default: members_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Tree name (default: first tree)
        #[arg(short, long)]
        tree: Option<String>,
        /// Highlight members whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Highlight members graduating in this year
        #[arg(short, long)]
        year: Option<i32>,
        /// Print JSON instead of a text tree
        #[arg(long)]
        json: bool,
    },

    /// List family trees
    Trees {
        /// Members JSON file (default: members_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Print the whole forest as JSON
        #[arg(long)]
        json: bool,
    },

    /// List graduation years (newest first)
    Years {
        /// Members JSON file (default: members_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print config template
    Template,
}
