//! Settings schema definitions.
//!
//! These are the engine's own settings, not the configuration it resolves:
//! where relative locations are anchored, which profiles are explicit and
//! what to do when an import location does not exist.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::import::NotFoundAction;
use crate::profiles::{ExplicitProfiles, DEFAULT_PROFILE};

/// Complete settings structure.
///
/// Every field is optional so that partial files can be layered; see
/// [`SettingsMerger`](crate::settings::SettingsMerger).
///
/// # Examples
///
/// ```
/// use stratum::settings::Settings;
/// use stratum::NotFoundAction;
///
/// let settings: Settings = serde_yaml::from_str(
///     "on_not_found: ignore\nprofiles:\n  active: [prod]\n",
/// )
/// .unwrap();
/// assert_eq!(settings.not_found_action(), NotFoundAction::Ignore);
/// assert_eq!(settings.explicit_profiles().active, vec!["prod".to_string()]);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Policy for import locations that resolve to nothing.
    pub on_not_found: Option<NotFoundAction>,

    /// Explicit profile settings.
    pub profiles: Option<ProfileSettings>,

    /// Directory that relative `file:` locations are anchored to.
    pub base_dir: Option<PathBuf>,

    /// Roots searched by `classpath:` locations.
    pub resource_roots: Option<Vec<PathBuf>>,

    /// Locations imported by the initial source.
    pub imports: Option<Vec<String>>,
}

/// Profile lists supplied by settings rather than bound from sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProfileSettings {
    /// Explicitly active profiles.
    pub active: Option<Vec<String>>,

    /// Explicit default profiles.
    pub default: Option<Vec<String>>,

    /// Profiles merged into the active list regardless of configuration.
    pub additional: Option<Vec<String>>,
}

impl Settings {
    /// The not-found policy, [`NotFoundAction::Fail`] when unset.
    #[must_use]
    pub fn not_found_action(&self) -> NotFoundAction {
        self.on_not_found.unwrap_or_default()
    }

    /// Convert the profile settings into the engine's explicit profiles.
    ///
    /// Unset lists keep their "unset" sentinels so that the engine binds
    /// them from configuration instead.
    #[must_use]
    pub fn explicit_profiles(&self) -> ExplicitProfiles {
        let Some(profiles) = &self.profiles else {
            return ExplicitProfiles::default();
        };
        ExplicitProfiles {
            active: profiles.active.clone().unwrap_or_default(),
            default: profiles
                .default
                .clone()
                .unwrap_or_else(|| vec![DEFAULT_PROFILE.to_string()]),
            additional: profiles.additional.clone().unwrap_or_default(),
        }
    }

    /// The base directory, falling back to `working_dir`.
    #[must_use]
    pub fn base_dir_or(&self, working_dir: &Path) -> PathBuf {
        self.base_dir
            .clone()
            .unwrap_or_else(|| working_dir.to_path_buf())
    }

    /// The resource roots, empty when unset.
    #[must_use]
    pub fn resource_roots(&self) -> &[PathBuf] {
        self.resource_roots.as_deref().unwrap_or_default()
    }

    /// The initial imports, empty when unset.
    #[must_use]
    pub fn imports(&self) -> &[String] {
        self.imports.as_deref().unwrap_or_default()
    }
}
