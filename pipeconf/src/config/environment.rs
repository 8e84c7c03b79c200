//! Environment variable interpolation for configuration strings.
//!
//! Two token forms are recognized, in this order:
//!
//! 1. `${NAME}` anywhere in the string;
//! 2. bare `$NAME` immediately followed by `/` or the end of the string.
//!
//! `NAME` is upper-case letters, digits, `_` and `-`. Every token is looked up
//! on its own. Values that exist replace the token; missing ones leave the
//! token as unbraced literal text (`${NAME}` becomes `$NAME`). Interpolation
//! never fails.

use std::env;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::config::value::ConfigValue;

fn braced_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_\-][A-Z0-9_\-]*)\}").expect("braced env pattern is valid")
    })
}

fn bare_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$([A-Z_\-][A-Z0-9_\-]*)(/|$)").expect("bare env pattern is valid")
    })
}

/// Substitutes environment variables in `value` using the process
/// environment.
///
/// # Examples
///
/// ```
/// use pipeconf::config::environment::interpolate;
/// use pipeconf::ConfigValue;
///
/// let value = ConfigValue::from("${PIPECONF_DOC_SURELY_UNSET}");
/// assert_eq!(interpolate(value).as_str(), Some("$PIPECONF_DOC_SURELY_UNSET"));
/// ```
#[must_use]
pub fn interpolate(value: ConfigValue) -> ConfigValue {
    interpolate_with(value, &|name: &str| env::var(name).ok())
}

/// Substitutes variables in `value` using a custom lookup function.
///
/// This is the implementation behind [`interpolate`]; taking the lookup as a
/// parameter keeps it testable without touching the process environment.
#[must_use]
pub fn interpolate_with(value: ConfigValue, lookup: &dyn Fn(&str) -> Option<String>) -> ConfigValue {
    match value {
        ConfigValue::String(s) => ConfigValue::String(interpolate_str(&s, lookup)),
        ConfigValue::Sequence(items) => ConfigValue::Sequence(
            items
                .into_iter()
                .map(|item| interpolate_with(item, lookup))
                .collect(),
        ),
        ConfigValue::Tree(tree) => ConfigValue::Tree(
            tree.into_iter()
                .map(|(key, item)| (key, interpolate_with(item, lookup)))
                .collect(),
        ),
        other => other,
    }
}

/// Substitutes variables in a single string.
#[must_use]
pub fn interpolate_str(input: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let braced = braced_pattern().replace_all(input, |caps: &Captures<'_>| {
        let name = &caps[1];
        lookup(name).unwrap_or_else(|| format!("${name}"))
    });

    bare_pattern()
        .replace_all(&braced, |caps: &Captures<'_>| {
            let name = &caps[1];
            let terminator = &caps[2];
            match lookup(name) {
                Some(found) => format!("{found}{terminator}"),
                None => format!("${name}{terminator}"),
            }
        })
        .into_owned()
}
