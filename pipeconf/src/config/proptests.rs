//! Property-based tests for configuration trees.

use super::environment::interpolate_with;
use super::merger::merge;
use super::normalize::{none_strings_to_null, normalize_tree};
use super::path::{self, leaf_paths, KeyPath};
use super::value::{ConfigTree, ConfigValue};
use crate::diff::{diff, DiffEntry};
use proptest::prelude::*;

// Keys stay short so that generated trees overlap often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

fn leaf_strategy() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        Just(ConfigValue::Null),
        any::<bool>().prop_map(ConfigValue::Bool),
        any::<i64>().prop_map(ConfigValue::Integer),
        any::<f64>().prop_map(ConfigValue::Float),
        "[a-zA-Z0-9_/ ]{0,12}".prop_map(ConfigValue::String),
        Just(ConfigValue::from("None")),
    ]
}

// Strategy for nested values up to a few levels deep
fn value_strategy() -> impl Strategy<Value = ConfigValue> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ConfigValue::Sequence),
            prop::collection::btree_map(key_strategy(), inner, 0..4).prop_map(ConfigValue::Tree),
        ]
    })
}

fn tree_strategy() -> impl Strategy<Value = ConfigTree> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..5)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Every key of either side survives a merge
    #[test]
    fn merge_keeps_key_union(base in tree_strategy(), overrides in tree_strategy()) {
        let merged = merge(&base, &overrides);
        for key in base.keys().chain(overrides.keys()) {
            prop_assert!(merged.contains_key(key));
        }
        prop_assert_eq!(
            merged.len(),
            base.keys().chain(overrides.keys()).collect::<std::collections::BTreeSet<_>>().len()
        );
    }

    // Every override leaf is readable at its own path after a merge
    #[test]
    fn merge_override_leaves_win(base in tree_strategy(), overrides in tree_strategy()) {
        let merged = merge(&base, &overrides);
        for leaf in leaf_paths(&overrides) {
            prop_assert_eq!(path::get(&merged, &leaf).ok(), path::get(&overrides, &leaf).ok());
        }
    }

    // Merging an empty tree changes nothing, from either side
    #[test]
    fn merge_empty_is_identity(tree in tree_strategy()) {
        prop_assert_eq!(&merge(&tree, &ConfigTree::new()), &tree);
        prop_assert_eq!(&merge(&ConfigTree::new(), &tree), &tree);
    }

    // A value written at a leaf path is read back unchanged
    #[test]
    fn path_set_then_get(tree in tree_strategy(), value in leaf_strategy()) {
        let mut tree = tree;
        for leaf in leaf_paths(&tree.clone()) {
            path::set(&mut tree, &leaf, value.clone()).unwrap();
            prop_assert_eq!(path::get(&tree, &leaf).unwrap(), &value);
        }
    }

    // A one-key path reads the same value as direct key access
    #[test]
    fn single_key_path_matches_index(tree in tree_strategy()) {
        for (key, value) in &tree {
            prop_assert_eq!(path::get(&tree, &KeyPath::single(key.clone())).unwrap(), value);
        }
    }

    // Null normalization is idempotent and leaves no "none" strings
    #[test]
    fn normalization_idempotent(tree in tree_strategy()) {
        let once = normalize_tree(tree);
        let twice = normalize_tree(once.clone());
        prop_assert_eq!(&once, &twice);
        for leaf in leaf_paths(&once) {
            if let Ok(ConfigValue::String(s)) = path::get(&once, &leaf) {
                prop_assert!(!s.eq_ignore_ascii_case("none"));
            }
        }
    }

    // Normalization only ever replaces values with null
    #[test]
    fn normalization_preserves_non_none_leaves(value in leaf_strategy()) {
        let normalized = none_strings_to_null(value.clone());
        prop_assert!(normalized == value || normalized.is_null());
    }

    // A tree never differs from itself
    #[test]
    fn diff_with_self_is_empty(tree in tree_strategy()) {
        prop_assert!(diff(&tree, &tree).is_empty());
    }

    // Every diff entry reports a real disagreement, and agreeing leaves are absent
    #[test]
    fn diff_holds_only_disagreements(a in tree_strategy(), b in tree_strategy()) {
        let d = diff(&a, &b);

        for (path, entry) in d.entries() {
            match entry {
                DiffEntry::Differing { left, right } => {
                    prop_assert_ne!(left, right);
                    prop_assert_eq!(path::get(&a, &path).ok(), Some(left));
                    prop_assert_eq!(path::get(&b, &path).ok(), Some(right));
                }
                DiffEntry::LeftOnly(left) => {
                    prop_assert_eq!(path::get(&a, &path).ok(), Some(left));
                    prop_assert!(path::get(&b, &path).is_err());
                }
                DiffEntry::RightOnly(right) => {
                    prop_assert_eq!(path::get(&b, &path).ok(), Some(right));
                    prop_assert!(path::get(&a, &path).is_err());
                }
            }
        }

        for leaf in leaf_paths(&a) {
            let shared = matches!(
                (path::get(&a, &leaf), path::get(&b, &leaf)),
                (Ok(left), Ok(right)) if left == right
            );
            if shared {
                prop_assert!(d.get(&leaf).is_none());
            }
        }
    }

    // Swapping the sides of a diff swaps its projections
    #[test]
    fn diff_projections_swap(a in tree_strategy(), b in tree_strategy()) {
        let forward = diff(&a, &b);
        let backward = diff(&b, &a);
        prop_assert_eq!(forward.minuend(), backward.subtrahend());
        prop_assert_eq!(forward.subtrahend(), backward.minuend());
    }

    // Strings without `$` pass through environment interpolation untouched
    #[test]
    fn interpolation_without_dollar_is_identity(s in "[a-zA-Z0-9_/{} .]{0,24}") {
        let value = ConfigValue::from(s.clone());
        let lookup = |_: &str| Some("X".to_string());
        prop_assert_eq!(interpolate_with(value, &lookup), ConfigValue::from(s));
    }
}
