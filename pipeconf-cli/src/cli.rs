//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, DiffCommand, ListPreconfigsCommand, SeedFlagsCommand, ShowCommand,
    ValidateCommand,
};
use clap::{Parser, Subcommand, ValueEnum};
use pipeconf::output::OutputFormat;
use std::path::PathBuf;

/// Command-line tool for inspecting pipeline configurations.
#[derive(Parser)]
#[command(name = "pipeconf")]
#[command(
    version,
    about = "Inspect, validate and diff pipeline configurations",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Extra directory searched for `pipeline_config_<name>.yml` bases
    #[arg(
        long,
        value_name = "DIR",
        global = true,
        env = "PIPECONF_PRECONFIG_DIR"
    )]
    pub preconfig_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Build a configuration and print it
    Show(ShowCommand),

    /// Show the structural differences between two configurations
    Diff(DiffCommand),

    /// Check that a configuration file builds
    Validate(ValidateCommand),

    /// List the available base configurations
    ListPreconfigs(ListPreconfigsCommand),

    /// Print the flags that pin a tool's randomness
    SeedFlags(SeedFlagsCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

/// Output format shared by `show` and `diff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum FormatArg {
    /// YAML
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
    /// One `path: value` line per leaf
    Human,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => Self::Yaml,
            FormatArg::Json => Self::Json,
            FormatArg::Human => Self::Human,
        }
    }
}
