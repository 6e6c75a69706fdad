//! Settings file discovery and loading.
//!
//! This module handles discovering and loading stratum settings files
//! from various locations with proper precedence.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::path::normalize::{absolutize, expand_tilde};
use crate::settings::schema::Settings;

/// File name of the shared project settings.
pub const PROJECT_FILE: &str = "stratum.yaml";

/// File name of the private project settings.
pub const LOCAL_FILE: &str = "stratum.local.yaml";

/// File name of the user settings inside the settings directory.
pub const USER_FILE: &str = "settings.yaml";

/// Settings source with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
///
/// # Examples
///
/// ```
/// use stratum::settings::SettingsSource;
/// use std::path::PathBuf;
///
/// // User settings have the lowest precedence
/// let user = SettingsSource {
///     path: PathBuf::from("~/.stratum/settings.yaml"),
///     precedence: 1,
///     settings: Default::default(),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct SettingsSource {
    /// Path to the settings file.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed settings.
    pub settings: Settings,
}

/// Loads settings from their standard locations.
///
/// # Examples
///
/// ```no_run
/// use stratum::settings::SettingsLoader;
/// use std::path::Path;
///
/// let sources = SettingsLoader::load_all(Path::new("."), None).unwrap();
/// println!("Found {} settings files", sources.len());
/// ```
pub struct SettingsLoader;

impl SettingsLoader {
    /// Discover and load all settings files.
    ///
    /// Searches for:
    /// 1. User settings at `~/.stratum/settings.yaml` (precedence 1)
    /// 2. Project `stratum.yaml` walking up from `working_dir` (precedence 2)
    /// 3. Project `stratum.local.yaml` (precedence 3)
    ///
    /// `settings_dir` overrides the directory holding the user settings.
    ///
    /// # Errors
    ///
    /// Returns an error if any settings file exists but cannot be read
    /// or parsed.
    pub fn load_all(
        working_dir: &Path,
        settings_dir: Option<&Path>,
    ) -> Result<Vec<SettingsSource>> {
        let mut sources = Vec::new();

        if let Some(user) = Self::load_user_settings(settings_dir)? {
            sources.push(user);
        }

        sources.extend(Self::discover_project_settings(working_dir)?);
        sources.sort_by_key(|s| s.precedence);

        Ok(sources)
    }

    fn load_user_settings(settings_dir: Option<&Path>) -> Result<Option<SettingsSource>> {
        let path = match settings_dir {
            Some(dir) => dir.join(USER_FILE),
            None => default_settings_dir()?.join(USER_FILE),
        };

        if !path.exists() {
            return Ok(None);
        }

        let settings = Self::load_file(&path)?;
        Ok(Some(SettingsSource {
            path,
            precedence: 1,
            settings,
        }))
    }

    /// Discover project settings by walking up directories.
    ///
    /// Stops at the first directory containing either file.
    ///
    /// # Errors
    ///
    /// Returns an error if any discovered file cannot be read or parsed.
    pub fn discover_project_settings(start_dir: &Path) -> Result<Vec<SettingsSource>> {
        let mut found = Vec::new();
        let mut current = start_dir.to_path_buf();

        loop {
            for (name, precedence) in [(PROJECT_FILE, 2), (LOCAL_FILE, 3)] {
                let path = current.join(name);
                if path.exists() {
                    let settings = Self::load_file(&path)?;
                    found.push(SettingsSource {
                        path,
                        precedence,
                        settings,
                    });
                }
            }

            if !found.is_empty() || !current.pop() {
                break;
            }
        }

        Ok(found)
    }

    /// Load and parse a YAML settings file.
    ///
    /// `~` is expanded in `base_dir` and `resource_roots`; relative entries
    /// are anchored to the directory containing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<Settings> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read settings file: {e}"),
        })?;

        let mut settings: Settings =
            serde_yaml::from_str(&contents).map_err(|e| Error::Validation {
                field: format!("{}", path.display()),
                message: format!("Invalid YAML: {e}"),
            })?;

        if let Some(dir) = path.parent() {
            anchor(&mut settings, dir)?;
        }
        Ok(settings)
    }
}

/// The directory holding user settings, `~/.stratum`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_settings_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: PathBuf::from("~"),
        reason: "Cannot determine home directory".to_string(),
    })?;
    Ok(home.join(".stratum"))
}

fn anchor(settings: &mut Settings, dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if let Some(base_dir) = &settings.base_dir {
        settings.base_dir = Some(absolutize(&expand_tilde(base_dir)?, dir)?);
    }
    if let Some(roots) = &settings.resource_roots {
        settings.resource_roots = Some(
            roots
                .iter()
                .map(|root| absolutize(&expand_tilde(root)?, dir))
                .collect::<Result<_>>()?,
        );
    }
    Ok(())
}
