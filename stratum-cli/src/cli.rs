//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, ExplainCommand, GetCommand, ResolveCommand, TreeCommand, ValidateCommand,
};
use crate::utils::parse_assignment;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stratum::NotFoundAction;

/// Command-line tool for inspecting layered configuration.
#[derive(Parser)]
#[command(name = "stratum")]
#[command(version, about = "Resolve layered configuration", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Use this settings file instead of discovering stratum.yaml
    #[arg(long, value_name = "PATH", global = true, env = "STRATUM_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Override the directory holding user settings
    #[arg(long, value_name = "PATH", global = true, env = "STRATUM_SETTINGS_DIR")]
    pub settings_dir: Option<PathBuf>,

    /// Activate a profile (repeatable)
    #[arg(long = "profile", value_name = "PROFILE", global = true)]
    pub profiles: Vec<String>,

    /// Use a default profile (repeatable)
    #[arg(long = "default-profile", value_name = "PROFILE", global = true)]
    pub default_profiles: Vec<String>,

    /// What to do when an import location does not exist
    #[arg(long, value_enum, value_name = "ACTION", global = true)]
    pub on_not_found: Option<NotFoundAction>,

    /// Set a property with the highest precedence (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment, global = true)]
    pub set: Vec<(String, String)>,

    /// Import a config location (repeatable, replaces configured imports)
    #[arg(long = "import", value_name = "LOCATION", global = true)]
    pub imports: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve and print every effective property
    Resolve(ResolveCommand),

    /// Print the value of one property
    Get(GetCommand),

    /// Show where a property value comes from
    Explain(ExplainCommand),

    /// Print the contributor tree
    Tree(TreeCommand),

    /// Validate a settings file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
