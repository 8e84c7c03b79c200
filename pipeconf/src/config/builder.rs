//! Configuration builder.
//!
//! [`ConfigurationBuilder`] runs the construction pipeline:
//!
//! 1. select the base named by `FROM` (blank when absent);
//! 2. deep-merge the overrides onto it;
//! 3. turn `"None"` strings into nulls and name nuisance regressors;
//! 4. validate;
//! 5. interpolate environment variables;
//! 6. resolve `${a.b}` self-references against the step 5 result.

use std::env;
use std::fmt;
use std::path::Path;

use crate::config::configuration::Configuration;
use crate::config::environment::interpolate_with;
use crate::config::loader::{load_yaml_file, PreconfigCatalog};
use crate::config::merger::merge;
use crate::config::normalize::{name_regressors, normalize_tree};
use crate::config::template::TemplateResolver;
use crate::config::validator::{ConfigValidator, Validator};
use crate::config::value::{ConfigTree, ConfigValue};
use crate::error::{Error, Result};

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// The steps of building a [`Configuration`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConstructionStage {
    /// The base tree has been chosen.
    BaseSelected,
    /// Overrides have been merged onto the base.
    Merged,
    /// `"None"` strings are nulls.
    NullNormalized,
    /// The validator accepted the tree.
    Validated,
    /// Environment variables are substituted.
    EnvResolved,
    /// Self-references are substituted.
    TemplateResolved,
}

impl fmt::Display for ConstructionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseSelected => write!(f, "base selected"),
            Self::Merged => write!(f, "merged"),
            Self::NullNormalized => write!(f, "null normalized"),
            Self::Validated => write!(f, "validated"),
            Self::EnvResolved => write!(f, "environment resolved"),
            Self::TemplateResolved => write!(f, "templates resolved"),
        }
    }
}

/// Builder for [`Configuration`]s with injectable collaborators.
///
/// # Examples
///
/// ```
/// use pipeconf::{tree, ConfigurationBuilder};
///
/// let config = ConfigurationBuilder::new()
///     .with_env_lookup(|name| (name == "FSLDIR").then(|| "/opt/fsl".to_string()))
///     .build(tree! { "FROM" => "default" })
///     .unwrap();
///
/// assert_eq!(config.get("FSLDIR").unwrap().as_str(), Some("/opt/fsl"));
/// ```
pub struct ConfigurationBuilder {
    catalog: PreconfigCatalog,
    validator: Box<dyn Validator>,
    env_lookup: EnvLookup,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigurationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationBuilder")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl ConfigurationBuilder {
    /// A builder using the catalog from [`PreconfigCatalog::from_env`],
    /// [`ConfigValidator`] and the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: PreconfigCatalog::from_env(),
            validator: Box::new(ConfigValidator),
            env_lookup: Box::new(|name| env::var(name).ok()),
        }
    }

    /// Uses `catalog` to resolve `FROM`.
    #[must_use]
    pub fn with_catalog(mut self, catalog: PreconfigCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Uses `validator` instead of [`ConfigValidator`].
    #[must_use]
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Reads environment variables through `lookup`.
    #[must_use]
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Treats every environment variable as unset.
    #[must_use]
    pub fn skip_env(self) -> Self {
        self.with_env_lookup(|_| None)
    }

    /// Builds a configuration from raw overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `FROM` cannot be resolved or the validator
    /// rejects the merged tree.
    pub fn build(&self, raw: ConfigTree) -> Result<Configuration> {
        let mut raw = raw;

        let base = self.select_base(raw.remove("FROM"))?;
        log_stage(ConstructionStage::BaseSelected);

        let merged = merge(&base, &raw);
        log_stage(ConstructionStage::Merged);

        let mut tree = normalize_tree(merged);
        name_regressors(&mut tree);
        log_stage(ConstructionStage::NullNormalized);

        let mut tree = self.validator.validate(tree)?;
        tree.remove("FROM");
        self.resolve_fsldir(&mut tree);
        log_stage(ConstructionStage::Validated);

        let tree: ConfigTree = tree
            .into_iter()
            .map(|(key, value)| (key, interpolate_with(value, &*self.env_lookup)))
            .collect();
        log_stage(ConstructionStage::EnvResolved);

        let snapshot = tree.clone();
        let mut resolver = TemplateResolver::new(&snapshot);
        let tree = resolver.resolve_tree(tree);
        let warnings = resolver.into_warnings();
        log_stage(ConstructionStage::TemplateResolved);

        Ok(Configuration::from_parts(tree, warnings))
    }

    /// Builds a configuration from a YAML file of overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, plus any error from
    /// [`build`](Self::build).
    pub fn build_from_file(&self, path: &Path) -> Result<Configuration> {
        let raw = load_yaml_file(path)?;
        self.build(raw)
    }

    /// Builds a named preconfiguration (or base file) with no overrides.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_from_preconfig(&self, name: &str) -> Result<Configuration> {
        let mut raw = ConfigTree::new();
        raw.insert("FROM".to_string(), ConfigValue::from(name));
        self.build(raw)
    }

    fn select_base(&self, from: Option<ConfigValue>) -> Result<ConfigTree> {
        match from {
            Some(ConfigValue::String(name)) => {
                log::debug!("base configuration: {name}");
                self.catalog.resolve_base(&name)
            }
            Some(ConfigValue::Null) | None => {
                log::debug!("base configuration: blank");
                self.catalog.blank()
            }
            Some(other) => Err(Error::Schema {
                field: "FROM".into(),
                message: format!("expected a string, found {}", other.type_name()),
            }),
        }
    }

    /// A top-level `FSLDIR` of `FSLDIR`, `$FSLDIR` or `${FSLDIR}` takes the
    /// value of the `FSLDIR` environment variable, when it is set.
    fn resolve_fsldir(&self, tree: &mut ConfigTree) {
        let placeholder = matches!(
            tree.get("FSLDIR").and_then(ConfigValue::as_str),
            Some("FSLDIR" | "$FSLDIR" | "${FSLDIR}")
        );
        if !placeholder {
            return;
        }
        if let Some(fsldir) = (self.env_lookup)("FSLDIR") {
            log::debug!("FSLDIR set from the environment: {fsldir}");
            tree.insert("FSLDIR".to_string(), ConfigValue::String(fsldir));
        }
    }
}

fn log_stage(stage: ConstructionStage) {
    log::debug!("configuration stage: {stage}");
}
