//! Structural differences between configuration trees.
//!
//! A [`DiffTree`] keeps only the keys on which two trees disagree. Nested
//! trees that disagree somewhere below are kept as nested `DiffTree`s; every
//! other disagreement is a [`DiffEntry`] leaf recording which side holds what.
//!
//! # Examples
//!
//! ```
//! use pipeconf::diff::{diff, DiffEntry, DiffNode};
//! use pipeconf::{tree, ConfigValue, KeyPath};
//!
//! let left = tree! { "a" => tree! { "b" => 1, "c" => 2 } };
//! let right = tree! { "a" => tree! { "b" => 1, "c" => 3 } };
//!
//! let d = diff(&left, &right);
//! let node = d.get(&KeyPath::parse("a.c").unwrap()).unwrap();
//! assert_eq!(
//!     node,
//!     &DiffNode::Entry(DiffEntry::Differing {
//!         left: ConfigValue::from(2),
//!         right: ConfigValue::from(3),
//!     })
//! );
//! assert!(d.get(&KeyPath::parse("a.b").unwrap()).is_none());
//! ```

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::path::KeyPath;
use crate::config::value::{ConfigTree, ConfigValue};

/// A disagreement at a single key.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffEntry {
    /// Both sides hold the key with different values.
    Differing {
        /// The minuend's value.
        left: ConfigValue,
        /// The subtrahend's value.
        right: ConfigValue,
    },
    /// Only the minuend holds the key.
    LeftOnly(ConfigValue),
    /// Only the subtrahend holds the key.
    RightOnly(ConfigValue),
}

impl DiffEntry {
    /// The minuend's value, if it has one.
    #[must_use]
    pub fn left(&self) -> Option<&ConfigValue> {
        match self {
            Self::Differing { left, .. } | Self::LeftOnly(left) => Some(left),
            Self::RightOnly(_) => None,
        }
    }

    /// The subtrahend's value, if it has one.
    #[must_use]
    pub fn right(&self) -> Option<&ConfigValue> {
        match self {
            Self::Differing { right, .. } | Self::RightOnly(right) => Some(right),
            Self::LeftOnly(_) => None,
        }
    }
}

/// Serialized as a mapping with `left` and/or `right`, so a one-sided entry
/// omits the side that lacks the key.
impl Serialize for DiffEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(left) = self.left() {
            map.serialize_entry("left", left)?;
        }
        if let Some(right) = self.right() {
            map.serialize_entry("right", right)?;
        }
        map.end()
    }
}

/// A node of a [`DiffTree`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum DiffNode {
    /// Both sides hold trees that differ somewhere below.
    Tree(DiffTree),
    /// A leaf-level disagreement.
    Entry(DiffEntry),
}

impl DiffNode {
    /// The minuend's side of this node, or `None` if it lacks the key.
    #[must_use]
    pub fn minuend(&self) -> Option<ConfigValue> {
        match self {
            Self::Tree(tree) => Some(ConfigValue::Tree(tree.minuend())),
            Self::Entry(entry) => entry.left().cloned(),
        }
    }

    /// The subtrahend's side of this node, or `None` if it lacks the key.
    #[must_use]
    pub fn subtrahend(&self) -> Option<ConfigValue> {
        match self {
            Self::Tree(tree) => Some(ConfigValue::Tree(tree.subtrahend())),
            Self::Entry(entry) => entry.right().cloned(),
        }
    }
}

/// The disagreeing keys of two trees.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct DiffTree {
    nodes: BTreeMap<String, DiffNode>,
}

impl DiffTree {
    /// Computes `minuend - subtrahend`.
    #[must_use]
    pub fn between(minuend: &ConfigTree, subtrahend: &ConfigTree) -> Self {
        let mut nodes = BTreeMap::new();

        for (key, left) in minuend {
            let Some(right) = subtrahend.get(key) else {
                nodes.insert(key.clone(), DiffNode::Entry(DiffEntry::LeftOnly(left.clone())));
                continue;
            };
            match (left, right) {
                (ConfigValue::Tree(l), ConfigValue::Tree(r)) => {
                    let nested = Self::between(l, r);
                    if !nested.is_empty() {
                        nodes.insert(key.clone(), DiffNode::Tree(nested));
                    }
                }
                _ if left == right => {}
                _ => {
                    nodes.insert(
                        key.clone(),
                        DiffNode::Entry(DiffEntry::Differing {
                            left: left.clone(),
                            right: right.clone(),
                        }),
                    );
                }
            }
        }

        for (key, right) in subtrahend {
            if !minuend.contains_key(key) {
                nodes.insert(key.clone(), DiffNode::Entry(DiffEntry::RightOnly(right.clone())));
            }
        }

        Self { nodes }
    }

    /// True when the two trees were equal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of disagreeing keys at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over this level's disagreeing keys in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DiffNode)> {
        self.nodes.iter()
    }

    /// The node at `path`, if the trees disagree there.
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<&DiffNode> {
        let (first, rest) = path.keys().split_first()?;
        let mut node = self.nodes.get(first)?;
        for key in rest {
            match node {
                DiffNode::Tree(tree) => node = tree.nodes.get(key)?,
                DiffNode::Entry(_) => return None,
            }
        }
        Some(node)
    }

    /// Every leaf-level disagreement with its full path, depth first.
    #[must_use]
    pub fn entries(&self) -> Vec<(KeyPath, &DiffEntry)> {
        let mut out = Vec::new();
        for (key, node) in &self.nodes {
            collect_entries(KeyPath::single(key.clone()), node, &mut out);
        }
        out
    }

    /// The minuend's values for every disagreeing key it holds.
    #[must_use]
    pub fn minuend(&self) -> ConfigTree {
        self.nodes
            .iter()
            .filter_map(|(key, node)| node.minuend().map(|value| (key.clone(), value)))
            .collect()
    }

    /// Alias of [`minuend`](Self::minuend).
    #[must_use]
    pub fn left(&self) -> ConfigTree {
        self.minuend()
    }

    /// The subtrahend's values for every disagreeing key it holds.
    #[must_use]
    pub fn subtrahend(&self) -> ConfigTree {
        self.nodes
            .iter()
            .filter_map(|(key, node)| node.subtrahend().map(|value| (key.clone(), value)))
            .collect()
    }

    /// Alias of [`subtrahend`](Self::subtrahend).
    #[must_use]
    pub fn right(&self) -> ConfigTree {
        self.subtrahend()
    }
}

fn collect_entries<'a>(prefix: KeyPath, node: &'a DiffNode, out: &mut Vec<(KeyPath, &'a DiffEntry)>) {
    match node {
        DiffNode::Tree(tree) => {
            for (key, child) in &tree.nodes {
                collect_entries(prefix.child(key.clone()), child, out);
            }
        }
        DiffNode::Entry(entry) => out.push((prefix, entry)),
    }
}

/// Computes the structural difference `minuend - subtrahend`.
#[must_use]
pub fn diff(minuend: &ConfigTree, subtrahend: &ConfigTree) -> DiffTree {
    DiffTree::between(minuend, subtrahend)
}
