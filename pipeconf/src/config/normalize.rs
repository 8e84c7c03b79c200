//! Normalization passes applied to a merged tree before validation.

use crate::config::path::{self, KeyPath};
use crate::config::value::{ConfigTree, ConfigValue};

/// Location of the nuisance regressor list.
const REGRESSORS_PATH: [&str; 3] = ["nuisance_corrections", "2-nuisance_regression", "Regressors"];

/// Rewrites every string equal to `"none"` (any case) to [`ConfigValue::Null`].
///
/// Recurses through sequences and trees. Idempotent.
///
/// # Examples
///
/// ```
/// use pipeconf::config::normalize::none_strings_to_null;
/// use pipeconf::ConfigValue;
///
/// let value = ConfigValue::from(vec!["None", "NONE", "nonesuch"]);
/// let normalized = none_strings_to_null(value);
/// assert_eq!(
///     normalized,
///     ConfigValue::from(vec![ConfigValue::Null, ConfigValue::Null, "nonesuch".into()])
/// );
/// ```
#[must_use]
pub fn none_strings_to_null(value: ConfigValue) -> ConfigValue {
    match value {
        ConfigValue::String(s) if s.eq_ignore_ascii_case("none") => ConfigValue::Null,
        ConfigValue::Sequence(items) => {
            ConfigValue::Sequence(items.into_iter().map(none_strings_to_null).collect())
        }
        ConfigValue::Tree(tree) => ConfigValue::Tree(normalize_tree(tree)),
        other => other,
    }
}

/// Tree form of [`none_strings_to_null`].
#[must_use]
pub fn normalize_tree(tree: ConfigTree) -> ConfigTree {
    tree.into_iter()
        .map(|(key, value)| (key, none_strings_to_null(value)))
        .collect()
}

/// Gives every nuisance regressor a usable `Name`.
///
/// Unnamed regressors become `Regressor-<n>` (1-based position) and spaces
/// in names are replaced with hyphens. Trees without a regressor list, or
/// with something other than a list there, are left alone.
pub fn name_regressors(tree: &mut ConfigTree) {
    let Ok(regressors_path) = KeyPath::new(REGRESSORS_PATH) else {
        return;
    };
    let Ok(ConfigValue::Sequence(regressors)) = path::get_mut(tree, &regressors_path) else {
        return;
    };

    for (i, regressor) in regressors.iter_mut().enumerate() {
        let Some(regressor) = regressor.as_tree_mut() else {
            continue;
        };
        let name = match regressor.get("Name") {
            Some(ConfigValue::String(name)) => name.replace(' ', "-"),
            Some(ConfigValue::Null) | None => format!("Regressor-{}", i + 1),
            Some(other) => other.to_string().replace(' ', "-"),
        };
        regressor.insert("Name".to_string(), ConfigValue::String(name));
    }
}
