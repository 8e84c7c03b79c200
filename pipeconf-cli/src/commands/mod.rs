//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `show`: Build a configuration and print it, or one value from it
//! - `diff`: Show the structural differences between two configurations
//! - `validate`: Check that a configuration file builds
//! - `list_preconfigs`: List packaged and search-directory bases
//! - `seed_flags`: Print the flags that pin a tool's randomness
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod diff;
pub mod list_preconfigs;
pub mod seed_flags;
pub mod show;
pub mod validate;

pub use completions::CompletionsCommand;
pub use diff::DiffCommand;
pub use list_preconfigs::ListPreconfigsCommand;
pub use seed_flags::SeedFlagsCommand;
pub use show::ShowCommand;
pub use validate::ValidateCommand;
