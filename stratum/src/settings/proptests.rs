//! Property-based tests for the settings system.

use super::merger::SettingsMerger;
use super::schema::{ProfileSettings, Settings};
use super::validator::SettingsValidator;
use crate::import::NotFoundAction;
use proptest::prelude::*;
use std::path::PathBuf;

fn profile_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9_.-]{0,8}", 0..4).prop_map(|s| s.into_iter().collect())
}

fn profiles_strategy() -> impl Strategy<Value = ProfileSettings> {
    (
        prop::option::of(profile_list()),
        prop::option::of(profile_list()),
        prop::option::of(profile_list()),
    )
        .prop_map(|(active, default, additional)| ProfileSettings {
            active,
            default,
            additional,
        })
}

fn settings_strategy() -> impl Strategy<Value = Settings> {
    (
        prop::option::of(prop_oneof![
            Just(NotFoundAction::Fail),
            Just(NotFoundAction::Ignore)
        ]),
        prop::option::of(profiles_strategy()),
        prop::option::of("/[a-z]{1,10}".prop_map(PathBuf::from)),
        prop::option::of(
            prop::collection::btree_set("[a-z]{1,6}\\.yml", 0..3)
                .prop_map(|s| s.into_iter().collect::<Vec<_>>()),
        ),
    )
        .prop_map(|(on_not_found, profiles, base_dir, imports)| Settings {
            on_not_found,
            profiles,
            base_dir,
            imports,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Higher precedence wins for every simple field it sets
    #[test]
    fn settings_merge_higher_precedence_wins(
        low in settings_strategy(),
        high in settings_strategy()
    ) {
        let mut result = low.clone();
        SettingsMerger::merge_into(&mut result, &high);

        prop_assert_eq!(result.on_not_found, high.on_not_found.or(low.on_not_found));
        prop_assert_eq!(&result.base_dir, if high.base_dir.is_some() { &high.base_dir } else { &low.base_dir });
        prop_assert_eq!(&result.imports, if high.imports.is_some() { &high.imports } else { &low.imports });
    }

    // Empty settings are the identity for merge
    #[test]
    fn settings_merge_identity(settings in settings_strategy()) {
        let mut merged = settings.clone();
        SettingsMerger::merge_into(&mut merged, &Settings::default());
        prop_assert_eq!(&merged, &settings);

        let mut from_empty = Settings::default();
        SettingsMerger::merge_into(&mut from_empty, &settings);
        prop_assert_eq!(from_empty, settings);
    }

    // Merging is associative
    #[test]
    fn settings_merge_associative(
        a in settings_strategy(),
        b in settings_strategy(),
        c in settings_strategy()
    ) {
        let mut left = a.clone();
        SettingsMerger::merge_into(&mut left, &b);
        SettingsMerger::merge_into(&mut left, &c);

        let mut b_merge_c = b;
        SettingsMerger::merge_into(&mut b_merge_c, &c);
        let mut right = a;
        SettingsMerger::merge_into(&mut right, &b_merge_c);

        prop_assert_eq!(left, right);
    }

    // Additional profiles from both sides survive a merge
    #[test]
    fn additional_profiles_accumulate(low in profile_list(), high in profile_list()) {
        let with = |additional: Vec<String>| Settings {
            profiles: Some(ProfileSettings { additional: Some(additional), ..Default::default() }),
            ..Default::default()
        };
        let mut merged = with(low.clone());
        SettingsMerger::merge_into(&mut merged, &with(high.clone()));

        let additional = merged.profiles.and_then(|p| p.additional).unwrap_or_default();
        for profile in low.iter().chain(high.iter()) {
            prop_assert!(additional.contains(profile));
        }
    }

    // Generated settings always validate
    #[test]
    fn generated_settings_validate(settings in settings_strategy()) {
        prop_assert!(SettingsValidator::validate(&settings).is_ok());
    }
}
