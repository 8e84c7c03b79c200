//! Configuration validation.
//!
//! Validation is a seam: a [`Validator`] receives the merged, null-normalized
//! tree and either returns the (possibly coerced) tree or rejects it. A
//! rejection aborts configuration construction and is surfaced unchanged.
//!
//! [`ConfigValidator`] is the built-in implementation. It only checks the
//! structure this library itself relies on; full schema rules belong to the
//! pipeline that consumes the configuration.

use crate::config::path::{self, KeyPath};
use crate::config::value::{ConfigTree, ConfigValue};
use crate::error::{Error, Result};
use crate::random_state::RandomSeed;

/// Validates a merged configuration tree.
///
/// Closures `Fn(ConfigTree) -> Result<ConfigTree>` implement this trait, which
/// is handy for plugging in an external schema.
///
/// # Examples
///
/// ```
/// use pipeconf::config::Validator;
/// use pipeconf::{tree, ConfigTree, Error, Result};
///
/// let reject_all = |_: ConfigTree| -> Result<ConfigTree> {
///     Err(Error::Schema { field: "root".into(), message: "nope".into() })
/// };
/// assert!(reject_all.validate(tree! { "a" => 1 }).is_err());
/// ```
pub trait Validator {
    /// Checks `tree`, returning the validated tree.
    ///
    /// # Errors
    ///
    /// Returns a schema error (or [`Error::InvalidSeed`]) describing the first
    /// violation found.
    fn validate(&self, tree: ConfigTree) -> Result<ConfigTree>;
}

impl<F> Validator for F
where
    F: Fn(ConfigTree) -> Result<ConfigTree>,
{
    fn validate(&self, tree: ConfigTree) -> Result<ConfigTree> {
        self(tree)
    }
}

/// Structural validation of pipeline configurations.
///
/// # Examples
///
/// ```
/// use pipeconf::config::{ConfigValidator, Validator};
/// use pipeconf::tree;
///
/// let t = tree! { "pipeline_setup" => tree! { "pipeline_name" => "ok" } };
/// ConfigValidator.validate(t).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

impl Validator for ConfigValidator {
    fn validate(&self, tree: ConfigTree) -> Result<ConfigTree> {
        if let Some(setup) = tree.get("pipeline_setup") {
            let setup = Self::require_tree("pipeline_setup", setup)?;
            Self::validate_pipeline_setup(setup)?;
        }

        if let Some(fsldir) = tree.get("FSLDIR") {
            if !matches!(fsldir, ConfigValue::String(_) | ConfigValue::Null) {
                return Err(Error::Schema {
                    field: "FSLDIR".into(),
                    message: format!("expected a string, found {}", fsldir.type_name()),
                });
            }
        }

        Self::validate_regressors(&tree)?;

        Ok(tree)
    }
}

impl ConfigValidator {
    fn require_tree<'a>(field: &str, value: &'a ConfigValue) -> Result<&'a ConfigTree> {
        value.as_tree().ok_or_else(|| Error::Schema {
            field: field.into(),
            message: format!("expected a mapping, found {}", value.type_name()),
        })
    }

    /// Validate `pipeline_setup`: the pipeline name and the random seed.
    fn validate_pipeline_setup(setup: &ConfigTree) -> Result<()> {
        match setup.get("pipeline_name") {
            Some(ConfigValue::String(name)) => {
                Self::validate_identifier("pipeline_setup.pipeline_name", name)?;
            }
            Some(ConfigValue::Null) | None => {}
            Some(other) => {
                return Err(Error::Schema {
                    field: "pipeline_setup.pipeline_name".into(),
                    message: format!("expected a string, found {}", other.type_name()),
                });
            }
        }

        if let Some(system_config) = setup.get("system_config") {
            let system_config =
                Self::require_tree("pipeline_setup.system_config", system_config)?;
            if let Some(seed) = system_config.get("random_seed") {
                RandomSeed::from_value(seed)?;
            }
        }

        Ok(())
    }

    /// Validate string identifiers such as the pipeline name.
    ///
    /// Checks that the identifier is non-empty after trimming, contains no
    /// null bytes, and is not longer than 255 characters.
    fn validate_identifier(field: &str, value: &str) -> Result<()> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(Error::Schema {
                field: field.into(),
                message: "Cannot be empty or only whitespace".into(),
            });
        }

        if trimmed.contains('\0') {
            return Err(Error::Schema {
                field: field.into(),
                message: "Cannot contain null bytes".into(),
            });
        }

        if trimmed.len() > 255 {
            return Err(Error::Schema {
                field: field.into(),
                message: "Cannot exceed 255 characters".into(),
            });
        }

        Ok(())
    }

    /// Validate the nuisance regressor list: a sequence of mappings.
    fn validate_regressors(tree: &ConfigTree) -> Result<()> {
        let regressors_path =
            KeyPath::new(["nuisance_corrections", "2-nuisance_regression", "Regressors"])?;
        let Ok(regressors) = path::get(tree, &regressors_path) else {
            return Ok(());
        };

        match regressors {
            ConfigValue::Null => Ok(()),
            ConfigValue::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    Self::require_tree(&format!("{regressors_path}[{i}]"), item)?;
                }
                Ok(())
            }
            other => Err(Error::Schema {
                field: regressors_path.to_string(),
                message: format!("expected a sequence, found {}", other.type_name()),
            }),
        }
    }
}
