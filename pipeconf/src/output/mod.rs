//! Output formatting for configurations and diffs.
//!
//! This module renders resolved configuration trees, single values and
//! structural diffs as YAML, JSON, or human-readable `path: value` lines.

mod formatters;

use crate::config::value::{ConfigTree, ConfigValue};
use crate::diff::DiffTree;
use crate::{Error, Result};

pub use formatters::{HumanFormatter, JsonFormatter, YamlFormatter};

/// Trait for formatting configuration data into different output formats.
pub trait OutputFormatter {
    /// Format a whole configuration tree.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format_tree(&self, tree: &ConfigTree) -> Result<String>;

    /// Format a single value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format_value(&self, value: &ConfigValue) -> Result<String>;

    /// Format a structural diff.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn format_diff(&self, diff: &DiffTree) -> Result<String>;
}

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// YAML, the format configurations are written in.
    #[default]
    Yaml,
    /// JSON format.
    Json,
    /// Human-readable `path: value` lines.
    Human,
}

impl OutputFormat {
    /// Parses a format name (`yaml`, `json` or `human`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for unknown names.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeconf::output::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
    /// assert!(OutputFormat::parse("xml").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "human" | "text" => Ok(Self::Human),
            _ => Err(Error::Parse {
                source_name: "output format".to_string(),
                message: format!("unknown format '{s}', expected yaml, json or human"),
            }),
        }
    }

    /// Create a formatter for this output format.
    #[must_use]
    pub fn create_formatter(&self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Yaml => Box::new(YamlFormatter),
            Self::Json => Box::new(JsonFormatter),
            Self::Human => Box::new(HumanFormatter),
        }
    }
}
