//! Self-referential template resolution.
//!
//! String values may embed `${a.b.c}` references to other values of the same
//! configuration. Each reference is replaced by the text form of the value it
//! names, looked up in a snapshot tree.
//!
//! # Limitations
//!
//! - Matching is greedy: `${a}/${b}` is one token whose path is
//!   `a}/${b`, which will not resolve.
//! - Resolution is a single pass. Text that a substitution brings in is never
//!   re-scanned, so a value that itself holds a template is spliced in
//!   verbatim.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::path::{self, KeyPath};
use crate::config::value::{ConfigTree, ConfigValue};

/// Tokens that are expected to stay unresolved and are skipped silently.
pub const BENIGN_UNRESOLVED: [&str; 2] = ["${resolution_for_anat}", "${func_resolution}"];

/// Keys holding spatial templates, resolved with `${FSLDIR}` exempt.
pub const SPATIAL_TEMPLATE_KEYS: [&str; 8] = [
    "template_brain_only_for_anat",
    "template_skull_for_anat",
    "ref_mask",
    "template_brain_only_for_func",
    "template_skull_for_func",
    "template_symmetric_brain_only",
    "template_symmetric_skull",
    "dilated_symmetric_brain_mask",
];

/// Token left to environment interpolation under spatial-template keys.
pub const FSLDIR_TOKEN: &str = "${FSLDIR}";

fn template_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{.*\}").expect("template pattern is valid"))
}

/// A `${...}` reference found in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateToken {
    /// The token exactly as written, braces included.
    pub raw: String,
    /// The text between the braces.
    pub inner: String,
}

impl TemplateToken {
    /// The dotted path this token refers to, if its inner text is a valid
    /// path.
    #[must_use]
    pub fn key_path(&self) -> Option<KeyPath> {
        KeyPath::parse(&self.inner).ok()
    }
}

/// Finds every template token in `input`, using greedy matching.
///
/// # Examples
///
/// ```
/// use pipeconf::config::template::find_tokens;
///
/// let tokens = find_tokens("${pipeline_setup.pipeline_name}_out");
/// assert_eq!(tokens[0].inner, "pipeline_setup.pipeline_name");
/// ```
#[must_use]
pub fn find_tokens(input: &str) -> Vec<TemplateToken> {
    template_pattern()
        .find_iter(input)
        .map(|m| {
            let raw = m.as_str().to_string();
            let inner = raw[2..raw.len() - 1].to_string();
            TemplateToken { raw, inner }
        })
        .collect()
}

/// A template reference that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWarning {
    /// The unresolved token.
    pub token: String,
    /// Dotted location of the string that held it.
    pub location: String,
}

impl std::fmt::Display for TemplateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unresolved template {} at {}; left in place",
            self.token, self.location
        )
    }
}

/// Resolves `${a.b}` references against a snapshot tree.
///
/// # Examples
///
/// ```
/// use pipeconf::config::TemplateResolver;
/// use pipeconf::{tree, ConfigValue};
///
/// let lookup = tree! { "a" => tree! { "b" => 5 } };
/// let mut resolver = TemplateResolver::new(&lookup);
/// let resolved = resolver.resolve(ConfigValue::from("${a.b}"), &[], "c");
/// assert_eq!(resolved.as_str(), Some("5"));
/// assert!(resolver.warnings().is_empty());
/// ```
pub struct TemplateResolver<'a> {
    lookup: &'a ConfigTree,
    warnings: Vec<TemplateWarning>,
}

impl<'a> TemplateResolver<'a> {
    /// Creates a resolver that reads referenced values from `lookup`.
    #[must_use]
    pub fn new(lookup: &'a ConfigTree) -> Self {
        Self {
            lookup,
            warnings: Vec::new(),
        }
    }

    /// Warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[TemplateWarning] {
        &self.warnings
    }

    /// Consumes the resolver, returning its warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<TemplateWarning> {
        self.warnings
    }

    /// Resolves every top-level value of `tree`.
    ///
    /// Values under [`SPATIAL_TEMPLATE_KEYS`] are resolved with
    /// [`FSLDIR_TOKEN`] exempt.
    #[must_use]
    pub fn resolve_tree(&mut self, tree: ConfigTree) -> ConfigTree {
        tree.into_iter()
            .map(|(key, value)| {
                let resolved = self.resolve_entry(&key, value, &key);
                (key, resolved)
            })
            .collect()
    }

    /// Resolves templates in `value`, skipping tokens listed in `exempt`.
    ///
    /// `location` names where `value` lives; it only appears in warnings.
    #[must_use]
    pub fn resolve(&mut self, value: ConfigValue, exempt: &[&str], location: &str) -> ConfigValue {
        let exempt: HashSet<&str> = exempt.iter().copied().collect();
        self.resolve_value(value, &exempt, location)
    }

    fn resolve_entry(&mut self, key: &str, value: ConfigValue, location: &str) -> ConfigValue {
        if SPATIAL_TEMPLATE_KEYS.contains(&key) {
            self.resolve(value, &[FSLDIR_TOKEN], location)
        } else {
            self.resolve(value, &[], location)
        }
    }

    fn resolve_value(
        &mut self,
        value: ConfigValue,
        exempt: &HashSet<&str>,
        location: &str,
    ) -> ConfigValue {
        match value {
            ConfigValue::String(s) => ConfigValue::String(self.resolve_str(s, exempt, location)),
            ConfigValue::Sequence(items) => ConfigValue::Sequence(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| self.resolve_value(item, exempt, &format!("{location}[{i}]")))
                    .collect(),
            ),
            ConfigValue::Tree(tree) => ConfigValue::Tree(
                tree.into_iter()
                    .map(|(key, item)| {
                        let child_location = format!("{location}.{key}");
                        let resolved = if SPATIAL_TEMPLATE_KEYS.contains(&key.as_str()) {
                            let mut with_fsldir = exempt.clone();
                            with_fsldir.insert(FSLDIR_TOKEN);
                            self.resolve_value(item, &with_fsldir, &child_location)
                        } else {
                            self.resolve_value(item, exempt, &child_location)
                        };
                        (key, resolved)
                    })
                    .collect(),
            ),
            other => other,
        }
    }

    fn resolve_str(&mut self, input: String, exempt: &HashSet<&str>, location: &str) -> String {
        let mut output = input.clone();
        for token in find_tokens(&input) {
            if exempt.contains(token.raw.as_str()) {
                continue;
            }
            match self.lookup_token(&token) {
                Some(text) => output = output.replace(&token.raw, &text),
                None if BENIGN_UNRESOLVED.contains(&token.raw.as_str()) => {}
                None => {
                    let warning = TemplateWarning {
                        token: token.raw,
                        location: location.to_string(),
                    };
                    log::warn!("{warning}");
                    self.warnings.push(warning);
                }
            }
        }
        output
    }

    fn lookup_token(&self, token: &TemplateToken) -> Option<String> {
        let key_path = token.key_path()?;
        path::get(self.lookup, &key_path).ok().map(ToString::to_string)
    }
}
