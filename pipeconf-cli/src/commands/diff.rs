//! Diff command implementation.
//!
//! This module implements the `diff` command, which builds two
//! configurations and prints the keys whose values differ.

use crate::cli::FormatArg;
use crate::error::CliError;
use crate::utils::{load_configuration, print_output, GlobalOptions};
use clap::Args;
use pipeconf::output::OutputFormat;

/// Show the structural differences between two configurations.
#[derive(Args)]
pub struct DiffCommand {
    /// Left-hand configuration: a file or a base name
    #[arg(value_name = "LEFT")]
    pub left: String,

    /// Right-hand configuration: a file or a base name
    #[arg(value_name = "RIGHT")]
    pub right: String,

    /// Output format
    #[arg(long, value_enum, default_value = "human", ignore_case = true)]
    pub format: FormatArg,

    /// Exit with status 1 when the configurations differ
    #[arg(long)]
    pub exit_code: bool,
}

impl DiffCommand {
    /// Execute the diff command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let left = load_configuration(global, &self.left)?;
        let right = load_configuration(global, &self.right)?;

        let diff = &left - &right;

        if diff.is_empty() {
            if !global.quiet {
                eprintln!("No differences");
            }
            return Ok(());
        }

        let formatter = OutputFormat::from(self.format).create_formatter();
        print_output(&formatter.format_diff(&diff)?);

        if self.exit_code {
            return Err(CliError::SemanticFailure(format!(
                "{} top-level sections differ",
                diff.len()
            )));
        }
        Ok(())
    }
}
