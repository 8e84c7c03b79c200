//! Deep merging of configuration trees.
//!
//! An override tree is layered onto a base so that users only restate the
//! keys they change.
//!
//! # Merging Rules
//!
//! - Both sides hold a tree at a key: recurse.
//! - Otherwise the override value replaces the base value outright.
//!   Sequences are replaced atomically, never merged element-wise.
//! - Keys present only in the base are kept unchanged.

use crate::config::value::{ConfigTree, ConfigValue};

/// Returns `base` with `overrides` merged on top of it.
///
/// # Examples
///
/// ```
/// use pipeconf::config::merger::merge;
/// use pipeconf::tree;
///
/// let base = tree! { "pipeline_setup" => tree! { "pipeline_name" => "base", "x" => 1 } };
/// let over = tree! { "pipeline_setup" => tree! { "pipeline_name" => "custom" } };
///
/// let merged = merge(&base, &over);
/// let setup = merged["pipeline_setup"].as_tree().unwrap();
/// assert_eq!(setup["pipeline_name"].as_str(), Some("custom"));
/// assert_eq!(setup["x"].as_i64(), Some(1));
/// ```
#[must_use]
pub fn merge(base: &ConfigTree, overrides: &ConfigTree) -> ConfigTree {
    let mut result = base.clone();
    merge_into(&mut result, overrides);
    result
}

/// Merges `overrides` into `target` in place (override wins).
pub fn merge_into(target: &mut ConfigTree, overrides: &ConfigTree) {
    for (key, value) in overrides {
        if let ConfigValue::Tree(override_tree) = value {
            if let Some(ConfigValue::Tree(target_tree)) = target.get_mut(key) {
                merge_into(target_tree, override_tree);
                continue;
            }
        }
        target.insert(key.clone(), value.clone());
    }
}
