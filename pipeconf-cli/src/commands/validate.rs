//! Command to validate a pipeline configuration file.

use crate::error::CliError;
use crate::utils::{builder, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Validate a pipeline configuration file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: PathBuf,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Check file exists
        if !self.config_path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                self.config_path.display()
            )));
        }

        // 2. Build it, which loads the base, merges and validates
        match builder(global).build_from_file(&self.config_path) {
            Ok(config) => {
                let unresolved = config.warnings().len();
                if unresolved > 0 && !global.quiet {
                    eprintln!("{unresolved} template reference(s) left unresolved");
                }
                println!("Configuration is valid");
                Ok(())
            }
            Err(e) => {
                eprintln!("Validation error: {e}");
                Err(CliError::SemanticFailure(
                    "Configuration validation failed".to_string(),
                ))
            }
        }
    }
}
