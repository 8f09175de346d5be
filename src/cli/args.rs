//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::EdgeRole;

/// Build binary decision trees from a node/edge graph and export them as YAML
#[derive(Parser, Debug)]
#[command(name = "dtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a graph holding only the root node
    Init {
        /// Overwrite an existing graph
        #[arg(short, long)]
        force: bool,
    },

    /// Add, edit and list nodes
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Connect and list edges
    Edge {
        #[command(subcommand)]
        command: EdgeCommands,
    },

    /// Show the derived decision tree
    Show,

    /// Write the decision tree document
    Export {
        /// Output file (default: <output_dir>/<artifact_name> from config)
        #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print the document instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Replace the graph with one rebuilt from a decision tree document
    Import {
        /// YAML document to read
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Overwrite an existing graph
        #[arg(short, long)]
        force: bool,
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
pub enum NodeCommands {
    /// Add a node with default label and threshold 0
    Add,

    /// Change a node's feature label and/or threshold
    Edit {
        /// Node id
        id: String,
        /// Feature name
        #[arg(short, long)]
        label: Option<String>,
        /// Threshold value
        #[arg(short, long, allow_negative_numbers = true)]
        threshold: Option<f64>,
    },

    /// List nodes with their outgoing edges
    List,
}

#[derive(Subcommand, Debug)]
pub enum EdgeCommands {
    /// Connect source -> target
    Add {
        /// Source node id
        source: String,
        /// Target node id
        target: String,
        /// Pin the child position instead of relying on edge order
        #[arg(short, long, value_enum)]
        role: Option<RoleArg>,
    },

    /// List edges in insertion order
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

/// Child position accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleArg {
    Left,
    Right,
}

impl From<RoleArg> for EdgeRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Left => EdgeRole::Left,
            RoleArg::Right => EdgeRole::Right,
        }
    }
}
