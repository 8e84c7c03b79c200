//! Show command implementation.
//!
//! This module implements the `show` command, which builds a configuration
//! and prints the resolved tree, or a single value from it.

use crate::cli::FormatArg;
use crate::error::CliError;
use crate::utils::{builder, print_output, GlobalOptions};
use clap::Args;
use pipeconf::config::load_yaml_file;
use pipeconf::output::OutputFormat;
use pipeconf::{ConfigTree, ConfigValue, KeyPath};
use std::path::PathBuf;

/// Build a configuration and print it.
#[derive(Args)]
pub struct ShowCommand {
    /// Override file to build (omit to show a base on its own)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Base configuration, replacing any `FROM` in the file
    #[arg(long, value_name = "NAME")]
    pub from: Option<String>,

    /// Dotted key path of a single value to print
    #[arg(long, value_name = "KEY.PATH")]
    pub path: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml", ignore_case = true)]
    pub format: FormatArg,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Assemble the raw overrides
        let mut raw = match self.file {
            Some(ref file) => {
                if !file.exists() {
                    return Err(CliError::InvalidArguments(format!(
                        "File not found: {}",
                        file.display()
                    )));
                }
                load_yaml_file(file)?
            }
            None if self.from.is_some() => ConfigTree::new(),
            None => {
                return Err(CliError::InvalidArguments(
                    "give a configuration file, --from <NAME>, or both".to_string(),
                ))
            }
        };
        if let Some(ref from) = self.from {
            raw.insert("FROM".to_string(), ConfigValue::from(from.as_str()));
        }

        // 2. Build
        let config = builder(global).build(raw)?;

        // 3. Format the requested part
        let formatter = OutputFormat::from(self.format).create_formatter();
        let output = match self.path {
            Some(ref dotted) => {
                let path = KeyPath::parse(dotted)?;
                formatter.format_value(config.get(&path)?)?
            }
            None => formatter.format_tree(config.as_tree())?,
        };

        print_output(&output);
        Ok(())
    }
}
