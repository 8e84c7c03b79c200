//! The resolved pipeline configuration.

use std::fmt;
use std::ops::Sub;
use std::path::Path;

use crate::config::builder::ConfigurationBuilder;
use crate::config::path::{self, KeyPath};
use crate::config::template::TemplateWarning;
use crate::config::value::{ConfigTree, ConfigValue};
use crate::diff::{diff, DiffTree};
use crate::error::{Error, Result};
use crate::random_state::RandomStateConfig;

/// A key into a [`Configuration`]: a top-level attribute name or a path.
///
/// Strings become attributes; arrays, slices and vectors of strings become
/// paths. Paths are checked for emptiness when used.
///
/// # Examples
///
/// ```
/// use pipeconf::ConfigKey;
///
/// assert!(matches!(ConfigKey::from("FSLDIR"), ConfigKey::Attribute(_)));
/// assert!(matches!(
///     ConfigKey::from(["pipeline_setup", "pipeline_name"]),
///     ConfigKey::Path(_)
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigKey {
    /// A top-level attribute.
    Attribute(String),
    /// A sequence of nested keys.
    Path(Vec<String>),
}

impl ConfigKey {
    /// The key as a [`KeyPath`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyType`] for an empty path.
    pub fn to_key_path(&self) -> Result<KeyPath> {
        match self {
            Self::Attribute(name) => Ok(KeyPath::single(name.clone())),
            Self::Path(keys) => KeyPath::new(keys.iter().cloned()),
        }
    }
}

impl From<&str> for ConfigKey {
    fn from(name: &str) -> Self {
        Self::Attribute(name.to_string())
    }
}

impl From<String> for ConfigKey {
    fn from(name: String) -> Self {
        Self::Attribute(name)
    }
}

impl From<&String> for ConfigKey {
    fn from(name: &String) -> Self {
        Self::Attribute(name.clone())
    }
}

impl<const N: usize> From<[&str; N]> for ConfigKey {
    fn from(keys: [&str; N]) -> Self {
        Self::Path(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

impl From<&[&str]> for ConfigKey {
    fn from(keys: &[&str]) -> Self {
        Self::Path(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

impl From<Vec<String>> for ConfigKey {
    fn from(keys: Vec<String>) -> Self {
        Self::Path(keys)
    }
}

impl From<&KeyPath> for ConfigKey {
    fn from(path: &KeyPath) -> Self {
        Self::Path(path.keys().to_vec())
    }
}

impl From<KeyPath> for ConfigKey {
    fn from(path: KeyPath) -> Self {
        Self::from(&path)
    }
}

impl TryFrom<&ConfigValue> for ConfigKey {
    type Error = Error;

    fn try_from(value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::String(name) => Ok(Self::Attribute(name.clone())),
            other => KeyPath::try_from(other).map(Self::from),
        }
    }
}

/// A fully resolved pipeline configuration.
///
/// Each top-level key is an attribute. The set of attributes is fixed once
/// the configuration is built; their values can still be changed.
///
/// # Examples
///
/// ```
/// use pipeconf::{tree, ConfigValue, Configuration};
///
/// let config = Configuration::new(tree! {
///     "FROM" => "default",
///     "pipeline_setup" => tree! { "pipeline_name" => "my-pipeline" },
/// })
/// .unwrap();
///
/// assert_eq!(config.pipeline_name(), Some("my-pipeline"));
/// assert_eq!(
///     config.get(["pipeline_setup", "pipeline_name"]).unwrap(),
///     &ConfigValue::from("my-pipeline")
/// );
/// assert_eq!(config.to_string(), "Pipeline configuration ('my-pipeline')");
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    tree: ConfigTree,
    warnings: Vec<TemplateWarning>,
}

impl Configuration {
    pub(crate) fn from_parts(tree: ConfigTree, warnings: Vec<TemplateWarning>) -> Self {
        Self { tree, warnings }
    }

    /// Builds a configuration from raw overrides with the default catalog,
    /// validator and process environment.
    ///
    /// A `FROM` key in `raw` names the base; without it the blank template
    /// is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the base cannot be resolved or validation fails.
    pub fn new(raw: ConfigTree) -> Result<Self> {
        ConfigurationBuilder::new().build(raw)
    }

    /// Builds a configuration from a YAML file of overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or the configuration
    /// cannot be built.
    pub fn from_file(path: &Path) -> Result<Self> {
        ConfigurationBuilder::new().build_from_file(path)
    }

    /// Builds a named preconfiguration with no overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreconfiguration`] for unknown names and any
    /// construction error.
    pub fn from_preconfig(name: &str) -> Result<Self> {
        ConfigurationBuilder::new().build_from_preconfig(name)
    }

    /// Reads the value at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key or path does not resolve and
    /// [`Error::InvalidKeyType`] for an empty path.
    pub fn get(&self, key: impl Into<ConfigKey>) -> Result<&ConfigValue> {
        let key_path = key.into().to_key_path()?;
        path::get(&self.tree, &key_path)
    }

    /// Reads the value at `key` mutably.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_mut(&mut self, key: impl Into<ConfigKey>) -> Result<&mut ConfigValue> {
        let key_path = key.into().to_key_path()?;
        path::get_mut(&mut self.tree, &key_path)
    }

    /// Reads the value at a dynamically typed key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyType`] unless `key` is a string or a
    /// sequence of strings, and [`Error::KeyNotFound`] if it does not
    /// resolve.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeconf::{ConfigValue, Configuration, Error};
    ///
    /// let config = Configuration::from_preconfig("blank").unwrap();
    /// assert!(config.try_get(&ConfigValue::from("pipeline_setup")).is_ok());
    /// assert!(matches!(
    ///     config.try_get(&ConfigValue::from(3)),
    ///     Err(Error::InvalidKeyType { .. })
    /// ));
    /// ```
    pub fn try_get(&self, key: &ConfigValue) -> Result<&ConfigValue> {
        self.get(ConfigKey::try_from(key)?)
    }

    /// Writes `value` at `key`.
    ///
    /// Only existing attributes can be written. Within an attribute, every
    /// level but the last must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] for an unknown attribute or a missing
    /// intermediate level, and [`Error::InvalidKeyType`] for an empty path.
    pub fn set(&mut self, key: impl Into<ConfigKey>, value: impl Into<ConfigValue>) -> Result<()> {
        let key_path = key.into().to_key_path()?;
        if !self.tree.contains_key(key_path.head()) {
            return Err(Error::KeyNotFound {
                path: key_path.head().to_string(),
            });
        }
        path::set(&mut self.tree, &key_path, value.into())?;
        Ok(())
    }

    /// The top-level attribute names, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tree.keys().map(String::as_str)
    }

    /// The path of every leaf value.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<KeyPath> {
        path::leaf_paths(&self.tree)
    }

    /// The whole resolved tree.
    #[must_use]
    pub fn as_tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Consumes the configuration, returning its tree.
    #[must_use]
    pub fn into_tree(self) -> ConfigTree {
        self.tree
    }

    /// `pipeline_setup.pipeline_name`, if it is a string.
    #[must_use]
    pub fn pipeline_name(&self) -> Option<&str> {
        self.get(["pipeline_setup", "pipeline_name"])
            .ok()
            .and_then(ConfigValue::as_str)
    }

    /// Name of the output directory for a pipeline.
    ///
    /// An explicit name gets a `pipeline_` prefix unless it already has one;
    /// without one the configured pipeline name is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeconf::Configuration;
    ///
    /// let config = Configuration::from_preconfig("default").unwrap();
    /// assert_eq!(config.pipeline_dir_name(None), "pipeline_cpac-default-pipeline");
    /// assert_eq!(config.pipeline_dir_name(Some("mine")), "pipeline_mine");
    /// assert_eq!(config.pipeline_dir_name(Some("pipeline_mine")), "pipeline_mine");
    /// ```
    #[must_use]
    pub fn pipeline_dir_name(&self, name: Option<&str>) -> String {
        match name {
            Some(name) if name.starts_with("pipeline_") => name.to_string(),
            Some(name) => format!("pipeline_{name}"),
            None => match self.get(["pipeline_setup", "pipeline_name"]) {
                Ok(value) => format!("pipeline_{value}"),
                Err(_) => format!("pipeline_{}", ConfigValue::Null),
            },
        }
    }

    /// The random state configured at `pipeline_setup.system_config.random_seed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeed`] if the value was changed to an invalid
    /// seed after construction.
    pub fn random_state(&self) -> Result<RandomStateConfig> {
        RandomStateConfig::from_tree(&self.tree)
    }

    /// Template references that could not be resolved while building.
    #[must_use]
    pub fn warnings(&self) -> &[TemplateWarning] {
        &self.warnings
    }

    /// The structural difference `self - other`.
    #[must_use]
    pub fn diff(&self, other: &Self) -> DiffTree {
        diff(&self.tree, &other.tree)
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get(["pipeline_setup", "pipeline_name"]) {
            Ok(name) => write!(f, "Pipeline configuration ('{name}')"),
            Err(_) => write!(f, "Pipeline configuration ('{}')", ConfigValue::Null),
        }
    }
}

impl Sub for &Configuration {
    type Output = DiffTree;

    fn sub(self, rhs: Self) -> DiffTree {
        self.diff(rhs)
    }
}
