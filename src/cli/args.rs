//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Party network admin: manage union, village, ward and booth units
#[derive(Parser, Debug)]
#[command(name = "partynet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the whole network as a tree
    Tree {
        /// Print unit counts per level
        #[arg(long)]
        stats: bool,
    },

    /// Show a single unit
    Show {
        /// Unit id
        id: String,
    },

    /// List the direct children of a unit
    Children {
        /// Parent unit id
        id: String,
    },

    /// Add a unit
    Add {
        /// union, village, ward or booth
        level: String,
        /// Display name
        name: String,
        /// Parent unit id (required unless level is union)
        #[arg(short, long)]
        parent: Option<String>,
        #[command(flatten)]
        details: DetailArgs,
    },

    /// Update descriptive fields of a unit
    Update {
        /// Unit id
        id: String,
        /// New display name
        #[arg(short, long)]
        name: Option<String>,
        #[command(flatten)]
        details: DetailArgs,
    },

    /// Delete a unit and everything below it
    Delete {
        /// Unit id
        id: String,
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

/// Office bearer details shared by add and update.
#[derive(Args, Debug, Default)]
pub struct DetailArgs {
    /// Office bearer name
    #[arg(long)]
    pub person: Option<String>,
    /// Office bearer role
    #[arg(long)]
    pub role: Option<String>,
    /// Contact phone
    #[arg(long)]
    pub phone: Option<String>,
    /// Photo URL or data URI
    #[arg(long, conflicts_with = "photo_file")]
    pub photo: Option<String>,
    /// Image file, stored inline as a data URI
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub photo_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
