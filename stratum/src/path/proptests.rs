//! Property-based tests for path normalization.

use super::normalize::{absolutize, normalize, resolve_components};
use proptest::prelude::*;
use std::path::{Component, PathBuf};

fn segment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z0-9_-]{1,12}",
        1 => Just(".".to_string()),
        1 => Just("..".to_string()),
    ]
}

fn absolute_path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec("[a-z0-9_-]{1,12}", 1..6).prop_map(|parts| {
        let mut path = PathBuf::from("/");
        path.extend(parts);
        path
    })
}

fn relative_path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(segment_strategy(), 1..8).prop_map(|parts| parts.iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn normalize_idempotent(path in absolute_path_strategy()) {
        let once = normalize(&path).unwrap();
        prop_assert_eq!(normalize(&once).unwrap(), once);
    }

    #[test]
    fn absolutized_paths_are_clean(base in absolute_path_strategy(), rel in relative_path_strategy()) {
        if let Ok(path) = absolutize(&rel, &base) {
            prop_assert!(path.is_absolute());
            for component in path.components() {
                prop_assert!(!matches!(component, Component::CurDir | Component::ParentDir));
            }
        }
    }

    #[test]
    fn resolve_components_keeps_clean_paths(path in absolute_path_strategy()) {
        prop_assert_eq!(resolve_components(&path).unwrap(), path);
    }
}
