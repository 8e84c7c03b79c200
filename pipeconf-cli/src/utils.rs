//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including base catalog setup, configuration loading and output.

use crate::error::CliError;
use pipeconf::{Configuration, ConfigurationBuilder, PreconfigCatalog};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)] // `verbose` is only consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Extra directory searched for base configurations.
    pub preconfig_dir: Option<PathBuf>,
}

/// The base catalog: packaged bases, plus `--preconfig-dir` when given.
pub fn catalog(global: &GlobalOptions) -> PreconfigCatalog {
    match global.preconfig_dir {
        Some(ref dir) => PreconfigCatalog::new().with_search_dir(dir),
        None => PreconfigCatalog::new(),
    }
}

/// A configuration builder reading the process environment and using
/// [`catalog`] for `FROM` lookups.
pub fn builder(global: &GlobalOptions) -> ConfigurationBuilder {
    ConfigurationBuilder::new().with_catalog(catalog(global))
}

/// Build a configuration from an existing file, or else from a base name.
///
/// A name that is neither a file nor a known base is reported by the
/// library as an unknown preconfiguration.
pub fn load_configuration(global: &GlobalOptions, source: &str) -> Result<Configuration, CliError> {
    let builder = builder(global);
    let path = Path::new(source);
    let config = if path.is_file() {
        builder.build_from_file(path)?
    } else {
        builder.build_from_preconfig(source)?
    };
    Ok(config)
}

/// Print formatted output to stdout, ending it with a newline.
pub fn print_output(output: &str) {
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_without_dir() {
        let global = GlobalOptions::default();
        assert!(catalog(&global).search_dirs().is_empty());
    }

    #[test]
    fn test_catalog_with_dir() {
        let global = GlobalOptions {
            preconfig_dir: Some(PathBuf::from("/opt/bases")),
            ..GlobalOptions::default()
        };
        assert_eq!(catalog(&global).search_dirs(), [PathBuf::from("/opt/bases")]);
    }

    #[test]
    fn test_load_packaged_name() {
        let config = load_configuration(&GlobalOptions::default(), "anat-only").unwrap();
        assert_eq!(config.pipeline_name(), Some("cpac-anat-only"));
    }

    #[test]
    fn test_load_unknown_name() {
        let err = load_configuration(&GlobalOptions::default(), "no-such-base").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
