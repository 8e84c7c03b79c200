//! Path-addressed access into configuration trees.
//!
//! A [`KeyPath`] is a non-empty sequence of keys, the first naming a
//! top-level entry. The same path type is used for reads and writes, and a
//! one-element path behaves exactly like single-key access.
//!
//! # Examples
//!
//! ```
//! use pipeconf::config::path::{self, KeyPath};
//! use pipeconf::{tree, ConfigValue};
//!
//! let mut t = tree! { "pipeline_setup" => tree! { "pipeline_name" => "old" } };
//! let p = KeyPath::parse("pipeline_setup.pipeline_name").unwrap();
//!
//! path::set(&mut t, &p, ConfigValue::from("new")).unwrap();
//! assert_eq!(path::get(&t, &p).unwrap().as_str(), Some("new"));
//! ```

use std::fmt;

use crate::config::value::{ConfigTree, ConfigValue};
use crate::error::{Error, Result};

/// An ordered, non-empty sequence of keys addressing a location in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Creates a path from its keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyType`] if `keys` is empty.
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(Error::InvalidKeyType {
                found: "an empty key sequence".to_string(),
            });
        }
        Ok(Self(keys))
    }

    /// Parses a dotted path such as `pipeline_setup.pipeline_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyType`] for an empty string.
    pub fn parse(dotted: &str) -> Result<Self> {
        if dotted.is_empty() {
            return Err(Error::InvalidKeyType {
                found: "an empty dotted path".to_string(),
            });
        }
        Self::new(dotted.split('.'))
    }

    /// A single-key path.
    #[must_use]
    pub fn single(key: impl Into<String>) -> Self {
        Self(vec![key.into()])
    }

    /// The keys of this path.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// The first key, naming the top-level entry.
    #[must_use]
    pub fn head(&self) -> &str {
        &self.0[0]
    }

    /// Number of keys.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a new path with `key` appended.
    #[must_use]
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    fn prefix(&self, len: usize) -> String {
        self.0[..len].join(".")
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl TryFrom<&ConfigValue> for KeyPath {
    type Error = Error;

    /// A string is a single key; a sequence of strings is a multi-key path.
    fn try_from(value: &ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::String(key) => Ok(Self::single(key.clone())),
            ConfigValue::Sequence(items) => {
                let keys = items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| Error::InvalidKeyType {
                            found: format!("sequence containing {} `{item}`", item.type_name()),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::new(keys)
            }
            other => Err(Error::InvalidKeyType {
                found: format!("{} `{other}`", other.type_name()),
            }),
        }
    }
}

/// Reads the value at `path`.
///
/// # Errors
///
/// Returns [`Error::KeyNotFound`] if any key is absent or an intermediate
/// value is not a tree.
pub fn get<'a>(tree: &'a ConfigTree, path: &KeyPath) -> Result<&'a ConfigValue> {
    let (parent_keys, leaf) = path.keys().split_at(path.len() - 1);
    let mut parent = tree;
    for (depth, key) in parent_keys.iter().enumerate() {
        parent = parent
            .get(key)
            .and_then(ConfigValue::as_tree)
            .ok_or_else(|| Error::KeyNotFound {
                path: path.prefix(depth + 1),
            })?;
    }
    parent.get(&leaf[0]).ok_or_else(|| Error::KeyNotFound {
        path: path.to_string(),
    })
}

/// Reads the value at `path` mutably.
///
/// # Errors
///
/// Same as [`get`].
pub fn get_mut<'a>(tree: &'a mut ConfigTree, path: &KeyPath) -> Result<&'a mut ConfigValue> {
    let (parent_keys, leaf) = path.keys().split_at(path.len() - 1);
    let parent = descend_mut(tree, path, parent_keys)?;
    parent.get_mut(&leaf[0]).ok_or_else(|| Error::KeyNotFound {
        path: path.to_string(),
    })
}

/// Writes `value` at `path`, returning the mutated tree.
///
/// Intermediate levels are never created: every key but the last must
/// already name a nested tree. The last key is overwritten, or inserted into
/// its existing parent.
///
/// # Errors
///
/// Returns [`Error::KeyNotFound`] if an intermediate key is absent or not a
/// tree.
pub fn set<'a>(
    tree: &'a mut ConfigTree,
    path: &KeyPath,
    value: ConfigValue,
) -> Result<&'a mut ConfigTree> {
    let (parent_keys, leaf) = path.keys().split_at(path.len() - 1);
    let parent = descend_mut(tree, path, parent_keys)?;
    parent.insert(leaf[0].clone(), value);
    Ok(tree)
}

fn descend_mut<'a>(
    tree: &'a mut ConfigTree,
    path: &KeyPath,
    keys: &[String],
) -> Result<&'a mut ConfigTree> {
    let mut current = tree;
    for (depth, key) in keys.iter().enumerate() {
        current = current
            .get_mut(key)
            .and_then(ConfigValue::as_tree_mut)
            .ok_or_else(|| Error::KeyNotFound {
                path: path.prefix(depth + 1),
            })?;
    }
    Ok(current)
}

/// Lists the path of every non-tree leaf, depth first in key order.
///
/// Empty nested trees contribute no paths.
///
/// # Examples
///
/// ```
/// use pipeconf::config::path::leaf_paths;
/// use pipeconf::tree;
///
/// let t = tree! { "test" => tree! { "nested" => 1, "dict" => 2 } };
/// let paths: Vec<String> = leaf_paths(&t).iter().map(ToString::to_string).collect();
/// assert_eq!(paths, ["test.dict", "test.nested"]);
/// ```
#[must_use]
pub fn leaf_paths(tree: &ConfigTree) -> Vec<KeyPath> {
    let mut out = Vec::new();
    for (key, value) in tree {
        collect_leaves(KeyPath::single(key.clone()), value, &mut out);
    }
    out
}

fn collect_leaves(prefix: KeyPath, value: &ConfigValue, out: &mut Vec<KeyPath>) {
    match value {
        ConfigValue::Tree(tree) => {
            for (key, child) in tree {
                collect_leaves(prefix.child(key.clone()), child, out);
            }
        }
        _ => out.push(prefix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    fn sample() -> ConfigTree {
        tree! {
            "a" => tree! { "b" => tree! { "c" => 1 } },
            "flat" => "x",
        }
    }

    #[test]
    fn test_get_nested() {
        let t = sample();
        let p = KeyPath::parse("a.b.c").unwrap();
        assert_eq!(get(&t, &p).unwrap(), &ConfigValue::Integer(1));
    }

    #[test]
    fn test_get_missing_reports_failing_prefix() {
        let t = sample();
        let err = get(&t, &KeyPath::parse("a.z.c").unwrap()).unwrap_err();
        match err {
            Error::KeyNotFound { path } => assert_eq!(path, "a.z"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_get_through_leaf_fails() {
        let t = sample();
        let err = get(&t, &KeyPath::parse("flat.deeper").unwrap()).unwrap_err();
        assert!(err.is_key_not_found());
    }

    #[test]
    fn test_single_key_matches_one_element_path() {
        let t = sample();
        let single = KeyPath::single("flat");
        let seq = KeyPath::new(["flat"]).unwrap();
        assert_eq!(single, seq);
        assert_eq!(get(&t, &single).unwrap(), get(&t, &seq).unwrap());
    }

    #[test]
    fn test_set_overwrites_leaf() {
        let mut t = sample();
        let p = KeyPath::parse("a.b.c").unwrap();
        set(&mut t, &p, ConfigValue::from("new")).unwrap();
        assert_eq!(get(&t, &p).unwrap().as_str(), Some("new"));
    }

    #[test]
    fn test_set_inserts_into_existing_parent() {
        let mut t = sample();
        let p = KeyPath::parse("a.b.d").unwrap();
        set(&mut t, &p, ConfigValue::Bool(true)).unwrap();
        assert_eq!(get(&t, &p).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_set_does_not_create_intermediates() {
        let mut t = sample();
        let before = t.clone();
        let err = set(&mut t, &KeyPath::parse("a.x.y").unwrap(), ConfigValue::Null);
        assert!(err.unwrap_err().is_key_not_found());
        assert_eq!(t, before);
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut t = sample();
        let p = KeyPath::parse("flat").unwrap();
        *get_mut(&mut t, &p).unwrap() = ConfigValue::Integer(9);
        assert_eq!(t["flat"], ConfigValue::Integer(9));
    }

    #[test]
    fn test_empty_paths_rejected() {
        assert!(matches!(
            KeyPath::parse(""),
            Err(Error::InvalidKeyType { .. })
        ));
        assert!(matches!(
            KeyPath::new(Vec::<String>::new()),
            Err(Error::InvalidKeyType { .. })
        ));
    }

    #[test]
    fn test_key_path_from_value() {
        let p = KeyPath::try_from(&ConfigValue::from(vec!["a", "b"])).unwrap();
        assert_eq!(p.to_string(), "a.b");

        let p = KeyPath::try_from(&ConfigValue::from("flat")).unwrap();
        assert_eq!(p.len(), 1);

        let err = KeyPath::try_from(&ConfigValue::Integer(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyType { .. }));

        let err = KeyPath::try_from(&ConfigValue::from(vec![1, 2])).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyType { .. }));
    }

    #[test]
    fn test_leaf_paths_skips_empty_trees() {
        let t = tree! { "empty" => ConfigTree::new(), "x" => 1 };
        let paths = leaf_paths(&t);
        assert_eq!(paths, vec![KeyPath::single("x")]);
    }
}
