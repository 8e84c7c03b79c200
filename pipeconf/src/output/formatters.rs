//! Output formatter implementations.

use std::fmt::Write as _;

use crate::config::path::leaf_paths;
use crate::config::value::{ConfigTree, ConfigValue};
use crate::diff::{DiffEntry, DiffTree};
use crate::Result;

use super::OutputFormatter;

/// Formatter for YAML output.
pub struct YamlFormatter;

impl OutputFormatter for YamlFormatter {
    fn format_tree(&self, tree: &ConfigTree) -> Result<String> {
        Ok(serde_yaml::to_string(tree)?)
    }

    fn format_value(&self, value: &ConfigValue) -> Result<String> {
        Ok(serde_yaml::to_string(value)?)
    }

    fn format_diff(&self, diff: &DiffTree) -> Result<String> {
        Ok(serde_yaml::to_string(diff)?)
    }
}

/// Formatter for pretty-printed JSON output.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_tree(&self, tree: &ConfigTree) -> Result<String> {
        Ok(serde_json::to_string_pretty(tree)?)
    }

    fn format_value(&self, value: &ConfigValue) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn format_diff(&self, diff: &DiffTree) -> Result<String> {
        Ok(serde_json::to_string_pretty(diff)?)
    }
}

/// Formatter for human-readable output.
///
/// Trees print one `path: value` line per leaf. Diffs print `-` for keys
/// only on the left, `+` for keys only on the right and `~` for changes.
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_tree(&self, tree: &ConfigTree) -> Result<String> {
        let mut output = String::new();
        for leaf in leaf_paths(tree) {
            let value = crate::config::path::get(tree, &leaf)?;
            let _ = writeln!(output, "{leaf}: {value}");
        }
        Ok(output)
    }

    fn format_value(&self, value: &ConfigValue) -> Result<String> {
        match value {
            ConfigValue::Tree(tree) => self.format_tree(tree),
            other => Ok(format!("{other}\n")),
        }
    }

    fn format_diff(&self, diff: &DiffTree) -> Result<String> {
        let mut output = String::new();
        for (path, entry) in diff.entries() {
            let _ = match entry {
                DiffEntry::Differing { left, right } => {
                    writeln!(output, "~ {path}: {left} -> {right}")
                }
                DiffEntry::LeftOnly(left) => writeln!(output, "- {path}: {left}"),
                DiffEntry::RightOnly(right) => writeln!(output, "+ {path}: {right}"),
            };
        }
        Ok(output)
    }
}
