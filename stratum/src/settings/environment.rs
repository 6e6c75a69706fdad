//! Environment variable handling for settings overrides.
//!
//! This module provides support for `STRATUM_*` environment variables that
//! override settings file values.

use std::env;
use std::path::PathBuf;

use crate::error::Result;
use crate::import::NotFoundAction;
use crate::settings::schema::{ProfileSettings, Settings};

/// Policy for missing import locations.
pub const ON_NOT_FOUND_ENV: &str = "STRATUM_ON_NOT_FOUND";
/// Comma-separated explicitly active profiles.
pub const ACTIVE_PROFILES_ENV: &str = "STRATUM_PROFILES_ACTIVE";
/// Comma-separated explicit default profiles.
pub const DEFAULT_PROFILES_ENV: &str = "STRATUM_PROFILES_DEFAULT";
/// Comma-separated additional profiles, accumulated onto file settings.
pub const ADDITIONAL_PROFILES_ENV: &str = "STRATUM_PROFILES_ADDITIONAL";
/// Base directory for relative locations.
pub const BASE_DIR_ENV: &str = "STRATUM_BASE_DIR";
/// Resource roots, separated like `PATH`.
pub const RESOURCE_ROOTS_ENV: &str = "STRATUM_RESOURCE_ROOTS";
/// Comma-separated initial imports.
pub const IMPORTS_ENV: &str = "STRATUM_IMPORTS";

/// Handles environment variable overrides for settings.
///
/// # Examples
///
/// ```no_run
/// use stratum::settings::{Settings, SettingsEnvironment};
///
/// let mut settings = Settings::default();
/// SettingsEnvironment::apply_overrides(&mut settings).unwrap();
/// ```
pub struct SettingsEnvironment;

impl SettingsEnvironment {
    /// Apply environment variable overrides to `settings`.
    ///
    /// Empty variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `STRATUM_ON_NOT_FOUND` is not `fail` or `ignore`.
    pub fn apply_overrides(settings: &mut Settings) -> Result<()> {
        if let Some(action) = var(ON_NOT_FOUND_ENV) {
            settings.on_not_found = Some(action.parse::<NotFoundAction>()?);
        }

        Self::apply_profile_overrides(settings);

        if let Some(dir) = var(BASE_DIR_ENV) {
            settings.base_dir = Some(PathBuf::from(dir));
        }

        if let Some(roots) = env::var_os(RESOURCE_ROOTS_ENV).filter(|v| !v.is_empty()) {
            settings.resource_roots = Some(env::split_paths(&roots).collect());
        }

        if let Some(imports) = var(IMPORTS_ENV) {
            settings.imports = Some(Self::parse_list(&imports));
        }

        Ok(())
    }

    fn apply_profile_overrides(settings: &mut Settings) {
        let active = var(ACTIVE_PROFILES_ENV).map(|v| Self::parse_list(&v));
        let default = var(DEFAULT_PROFILES_ENV).map(|v| Self::parse_list(&v));
        let additional = var(ADDITIONAL_PROFILES_ENV).map(|v| Self::parse_list(&v));

        if active.is_none() && default.is_none() && additional.is_none() {
            return;
        }

        let profiles = settings
            .profiles
            .get_or_insert_with(ProfileSettings::default);
        if active.is_some() {
            profiles.active = active;
        }
        if default.is_some() {
            profiles.default = default;
        }
        if let Some(extra) = additional {
            match &mut profiles.additional {
                Some(existing) => existing.extend(extra),
                None => profiles.additional = Some(extra),
            }
        }
    }

    /// Split a comma-separated value, trimming entries and dropping blanks.
    #[must_use]
    pub fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
