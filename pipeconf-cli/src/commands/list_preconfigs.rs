//! Command to list the available base configurations.

use crate::error::CliError;
use crate::utils::{catalog, GlobalOptions};
use clap::Args;

/// List the base configurations usable with `FROM`.
#[derive(Args)]
pub struct ListPreconfigsCommand {
    /// Also print where each base is loaded from
    #[arg(long)]
    pub sources: bool,
}

impl ListPreconfigsCommand {
    /// Execute the list-preconfigs command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let catalog = catalog(global);

        for name in catalog.list() {
            match catalog.lookup(&name) {
                Some(source) if self.sources => println!("{name}\t{}", source.label()),
                _ => println!("{name}"),
            }
        }

        Ok(())
    }
}
