//! Configuration values and trees.
//!
//! A configuration is a tree of string-keyed mappings whose leaves are
//! scalars or sequences. [`ConfigValue`] is the tagged union for every
//! position in that tree and [`ConfigTree`] is one level of mapping.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// One level of a configuration: string keys to values.
///
/// Key order carries no meaning; the sorted map keeps output and diffs
/// deterministic.
pub type ConfigTree = BTreeMap<String, ConfigValue>;

/// A value at any position of a configuration tree.
///
/// # Examples
///
/// ```
/// use pipeconf::ConfigValue;
///
/// let value = ConfigValue::from("cpac-default-pipeline");
/// assert_eq!(value.as_str(), Some("cpac-default-pipeline"));
/// assert_eq!(ConfigValue::from(5).to_string(), "5");
/// ```
///
/// Equality is structural, with two numeric rules: an integer equals a float
/// holding the same whole number, and NaN equals NaN.
///
/// ```
/// use pipeconf::ConfigValue;
///
/// assert_eq!(ConfigValue::from(1), ConfigValue::from(1.0));
/// assert_eq!(ConfigValue::Float(f64::NAN), ConfigValue::Float(f64::NAN));
/// ```
#[derive(Debug, Clone, Serialize, Default)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit absence of a value.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// An integral number.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string, possibly holding `$VAR` or `${a.b}` references.
    String(String),
    /// An ordered sequence; merged atomically.
    Sequence(Vec<ConfigValue>),
    /// A nested mapping.
    Tree(ConfigTree),
}

impl ConfigValue {
    /// Returns the nested tree, if this value is one.
    #[must_use]
    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the nested tree mutably, if this value is one.
    pub fn as_tree_mut(&mut self) -> Option<&mut ConfigTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the string slice, if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this value is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean, if this value is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the sequence, if this value is one.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this value is [`ConfigValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value is a nested tree.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree(_))
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Tree(_) => "mapping",
        }
    }

    /// Converts a parsed YAML document into a configuration value.
    ///
    /// Scalar mapping keys are stringified and YAML tags are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for mapping keys that are themselves
    /// sequences or mappings, or for integers that do not fit in `i64`.
    pub fn from_yaml(value: serde_yaml::Value, source_name: &str) -> Result<Self> {
        use serde_yaml::Value as Yaml;

        Ok(match value {
            Yaml::Null => Self::Null,
            Yaml::Bool(b) => Self::Bool(b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    if n.is_u64() {
                        return Err(Error::Parse {
                            source_name: source_name.to_string(),
                            message: format!("integer {n} is out of range"),
                        });
                    }
                    Self::Float(f)
                } else {
                    return Err(Error::Parse {
                        source_name: source_name.to_string(),
                        message: format!("unsupported number {n}"),
                    });
                }
            }
            Yaml::String(s) => Self::String(s),
            Yaml::Sequence(items) => Self::Sequence(
                items
                    .into_iter()
                    .map(|item| Self::from_yaml(item, source_name))
                    .collect::<Result<_>>()?,
            ),
            Yaml::Mapping(mapping) => {
                let mut tree = ConfigTree::new();
                for (key, value) in mapping {
                    let key = yaml_key_to_string(key, source_name)?;
                    tree.insert(key, Self::from_yaml(value, source_name)?);
                }
                Self::Tree(tree)
            }
            Yaml::Tagged(tagged) => Self::from_yaml(tagged.value, source_name)?,
        })
    }
}

fn yaml_key_to_string(key: serde_yaml::Value, source_name: &str) -> Result<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key_to_string(tagged.value, source_name),
        other => Err(Error::Parse {
            source_name: source_name.to_string(),
            message: format!("mapping keys must be scalars, found {other:?}"),
        }),
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => floats_equal(*a, *b),
            (Self::Integer(i), Self::Float(x)) | (Self::Float(x), Self::Integer(i)) => {
                integer_equals_float(*i, *x)
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Tree(a), Self::Tree(b)) => a == b,
            _ => false,
        }
    }
}

#[allow(clippy::float_cmp)]
fn floats_equal(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

#[allow(
    clippy::float_cmp,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
fn integer_equals_float(i: i64, x: f64) -> bool {
    // i64::MIN is exactly representable; 2^63 is the first float past i64::MAX
    let lower = i64::MIN as f64;
    x.fract() == 0.0 && x >= lower && x < -lower && x as i64 == i
}

/// Renders the value the way it is spliced into template strings.
///
/// Scalars print bare, null prints as `None`, and sequences and trees print
/// as JSON.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Sequence(_) | Self::Tree(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{json}")
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(value: ConfigTree) -> Self {
        Self::Tree(value)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(value: Vec<T>) -> Self {
        Self::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Builds a [`ConfigTree`] from `key => value` pairs.
///
/// Values go through `ConfigValue::from`, so nested `tree!` calls, string
/// literals and numbers can be mixed freely.
///
/// # Examples
///
/// ```
/// use pipeconf::tree;
///
/// let t = tree! {
///     "pipeline_setup" => tree! { "pipeline_name" => "custom1" },
///     "FSLDIR" => "FSLDIR",
/// };
/// assert_eq!(t.len(), 2);
/// ```
#[macro_export]
macro_rules! tree {
    () => { $crate::ConfigTree::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut tree = $crate::ConfigTree::new();
        $(tree.insert(::std::string::String::from($key), $crate::ConfigValue::from($value));)+
        tree
    }};
}
