//! Main entry point for the pipeconf CLI.
//!
//! This is the command-line interface for layered pipeline configurations.
//! It provides commands for working with them:
//! - `show`: Build a configuration and print it
//! - `diff`: Compare two configurations
//! - `validate`: Check that a configuration builds
//! - `list-preconfigs`: List the available base configurations
//! - `seed-flags`: Print tool flags for the configured random seed

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _level = pipeconf::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        preconfig_dir: cli.preconfig_dir,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::Diff(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::ListPreconfigs(cmd) => cmd.execute(&global),
        cli::Command::SeedFlags(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
