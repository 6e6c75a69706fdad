//! Assembling settings from all sources.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::import::Importer;
use crate::keys;
use crate::logging::Logger;
use crate::settings::environment::SettingsEnvironment;
use crate::settings::loader::{SettingsLoader, SettingsSource};
use crate::settings::merger::SettingsMerger;
use crate::settings::schema::Settings;
use crate::settings::validator::SettingsValidator;
use crate::source::PropertySource;

/// Name of the initial source carrying settings-level imports.
pub const SETTINGS_SOURCE_NAME: &str = "stratum settings";

/// Builder for [`Settings`].
///
/// Discovers settings files, applies `STRATUM_*` overrides and then any
/// programmatic overrides, and validates the merged result.
///
/// # Examples
///
/// ```
/// use stratum::settings::{Settings, SettingsBuilder};
/// use stratum::NotFoundAction;
///
/// let settings = SettingsBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_settings(Settings {
///         on_not_found: Some(NotFoundAction::Ignore),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.not_found_action(), NotFoundAction::Ignore);
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    working_dir: Option<PathBuf>,
    settings_dir: Option<PathBuf>,
    settings_file: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Vec<Settings>,
}

impl SettingsBuilder {
    /// A builder using the current directory and the default user
    /// settings directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start project discovery from `dir` instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Read user settings from `dir` instead of `~/.stratum`.
    #[must_use]
    pub fn with_settings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings_dir = Some(dir.into());
        self
    }

    /// Load exactly this file in place of project discovery.
    #[must_use]
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Skip all settings files.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skip `STRATUM_*` environment overrides.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Layer `settings` above every other source. Later calls win.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.overrides.push(settings);
        self
    }

    /// Merge and validate all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be read or parsed, an
    /// environment override is invalid, or validation fails.
    pub fn build(self) -> Result<Settings> {
        let sources = if self.skip_files {
            Vec::new()
        } else {
            self.load_files()?
        };

        let mut settings = SettingsMerger::merge(sources);

        if !self.skip_env {
            SettingsEnvironment::apply_overrides(&mut settings)?;
        }

        for overrides in &self.overrides {
            SettingsMerger::merge_into(&mut settings, overrides);
        }

        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }

    fn load_files(&self) -> Result<Vec<SettingsSource>> {
        let Some(path) = &self.settings_file else {
            let working_dir = self.working_dir()?;
            return SettingsLoader::load_all(&working_dir, self.settings_dir.as_deref());
        };
        Ok(vec![SettingsSource {
            path: path.clone(),
            precedence: 2,
            settings: SettingsLoader::load_file(path)?,
        }])
    }

    fn working_dir(&self) -> Result<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

impl Settings {
    /// The standard file-system importer these settings describe.
    ///
    /// Relative locations resolve against `base_dir`, or `working_dir` when
    /// unset.
    #[must_use]
    pub fn standard_importer(&self, working_dir: &Path, logger: Logger) -> Importer {
        Importer::standard(
            self.base_dir_or(working_dir),
            self.resource_roots().to_vec(),
            self.not_found_action(),
            logger,
        )
    }

    /// A source declaring the settings-level imports, if there are any.
    #[must_use]
    pub fn initial_source(&self) -> Option<PropertySource> {
        let imports = self.imports();
        if imports.is_empty() {
            return None;
        }
        let mut source = PropertySource::new(SETTINGS_SOURCE_NAME);
        for (i, import) in imports.iter().enumerate() {
            source.insert(format!("{}[{i}]", keys::IMPORT), import.as_str());
        }
        Some(source)
    }
}
