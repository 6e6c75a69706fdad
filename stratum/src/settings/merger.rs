//! Settings merging and precedence handling.
//!
//! Higher-precedence values replace lower ones field by field, except
//! `profiles.additional`, which accumulates across sources.

use crate::settings::loader::SettingsSource;
use crate::settings::schema::{ProfileSettings, Settings};

/// Merges settings sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use stratum::settings::{Settings, SettingsMerger};
/// use std::path::PathBuf;
///
/// let low = Settings { base_dir: Some(PathBuf::from("/low")), ..Default::default() };
/// let high = Settings { base_dir: Some(PathBuf::from("/high")), ..Default::default() };
///
/// let mut result = low;
/// SettingsMerger::merge_into(&mut result, &high);
/// assert_eq!(result.base_dir, Some(PathBuf::from("/high")));
/// ```
pub struct SettingsMerger;

impl SettingsMerger {
    /// Merge sources given from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<SettingsSource>) -> Settings {
        let mut result = Settings::default();
        for source in sources {
            Self::merge_into(&mut result, &source.settings);
        }
        result
    }

    /// Merge `source` into `target`; `source` wins.
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Resource roots and imports: complete replacement
    /// - Profiles: field-by-field, with `additional` accumulated (union)
    pub fn merge_into(target: &mut Settings, source: &Settings) {
        if source.on_not_found.is_some() {
            target.on_not_found = source.on_not_found;
        }

        if source.base_dir.is_some() {
            target.base_dir.clone_from(&source.base_dir);
        }

        if source.resource_roots.is_some() {
            target.resource_roots.clone_from(&source.resource_roots);
        }

        if source.imports.is_some() {
            target.imports.clone_from(&source.imports);
        }

        if let Some(profiles) = &source.profiles {
            match &mut target.profiles {
                Some(existing) => Self::merge_profiles(existing, profiles),
                None => target.profiles = Some(profiles.clone()),
            }
        }
    }

    fn merge_profiles(target: &mut ProfileSettings, source: &ProfileSettings) {
        if source.active.is_some() {
            target.active.clone_from(&source.active);
        }

        if source.default.is_some() {
            target.default.clone_from(&source.default);
        }

        if let Some(additional) = &source.additional {
            let merged = target.additional.get_or_insert_with(Vec::new);
            for profile in additional {
                if !merged.contains(profile) {
                    merged.push(profile.clone());
                }
            }
        }
    }
}
