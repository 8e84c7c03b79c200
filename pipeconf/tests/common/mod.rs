//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixtures for testing the
//! pipeconf library.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pipeconf::{ConfigurationBuilder, PreconfigCatalog};

/// Path to a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

/// Writes `content` to `dir/filename` and returns the path.
#[allow(dead_code)]
pub fn write_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

/// A builder that ignores the process environment and extra catalog
/// directories, so results do not depend on the machine running the tests.
#[allow(dead_code)]
pub fn isolated_builder() -> ConfigurationBuilder {
    ConfigurationBuilder::new()
        .with_catalog(PreconfigCatalog::new())
        .skip_env()
}

/// RAII guard for setting and restoring environment variables.
///
/// Tests using it must be marked `#[serial]`.
#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    /// Sets `key` to `value` until the guard is dropped.
    pub fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }

    /// Removes `key` until the guard is dropped.
    pub fn remove(key: &str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(val) => env::set_var(&self.key, val),
            None => env::remove_var(&self.key),
        }
    }
}
