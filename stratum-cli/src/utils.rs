//! Utility functions for CLI operations.
//!
//! This module assembles engine settings from the global options and runs
//! a resolution for the commands that need one.

use crate::error::CliError;
use std::env;
use std::path::{Path, PathBuf};
use stratum::path::normalize::normalize;
use stratum::settings::ProfileSettings;
use stratum::{
    ConfigEnvironment, Logger, NotFoundAction, PropertySource, ResolvedEnvironment, Settings,
    SettingsBuilder,
};

/// Name of the property source built from `--set` options.
pub const COMMAND_LINE_SOURCE: &str = "command line arguments";

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Logger configured from `--verbose`/`--quiet`.
    pub logger: Logger,

    /// Explicit settings file.
    pub settings: Option<PathBuf>,

    /// Override the user settings directory.
    pub settings_dir: Option<PathBuf>,

    /// Profiles given with `--profile`.
    pub profiles: Vec<String>,

    /// Profiles given with `--default-profile`.
    pub default_profiles: Vec<String>,

    /// Not-found policy override.
    pub on_not_found: Option<NotFoundAction>,

    /// Properties given with `--set`.
    pub set: Vec<(String, String)>,

    /// Locations given with `--import`.
    pub imports: Vec<String>,
}

impl GlobalOptions {
    /// Settings overrides expressed by the command line.
    ///
    /// Empty repeatable options leave the corresponding setting alone.
    pub fn overrides(&self) -> Settings {
        let profiles = (!self.profiles.is_empty() || !self.default_profiles.is_empty()).then(|| {
            ProfileSettings {
                active: non_empty(&self.profiles),
                default: non_empty(&self.default_profiles),
                additional: None,
            }
        });
        Settings {
            on_not_found: self.on_not_found,
            profiles,
            imports: non_empty(&self.imports),
            ..Default::default()
        }
    }

    /// The property source holding `--set` values, if any were given.
    pub fn command_line_source(&self) -> Option<PropertySource> {
        if self.set.is_empty() {
            return None;
        }
        Some(
            PropertySource::from_pairs(COMMAND_LINE_SOURCE, self.set.iter().cloned())
                .with_origin("command line"),
        )
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

/// Parse a `KEY=VALUE` assignment.
///
/// Used as the clap value parser for `--set`.
pub fn parse_assignment(text: &str) -> Result<(String, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{text}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{text}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Load layered settings.
///
/// Settings are merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Settings files
/// 4. Built-in defaults (lowest priority)
pub fn load_settings(global: &GlobalOptions, working_dir: &Path) -> Result<Settings, CliError> {
    let mut builder = SettingsBuilder::new()
        .with_working_dir(working_dir)
        .with_settings(global.overrides());

    if let Some(ref dir) = global.settings_dir {
        builder = builder.with_settings_dir(normalize(dir)?);
    }
    if let Some(ref file) = global.settings {
        if !file.exists() {
            return Err(CliError::InvalidArguments(format!(
                "Settings file not found: {}",
                file.display()
            )));
        }
        builder = builder.with_settings_file(normalize(file)?);
    }

    builder
        .build()
        .map_err(|e| CliError::Settings(e.to_string()))
}

/// Resolve the configuration described by the global options.
///
/// The initial sources are the `--set` properties followed by the
/// configured imports, so command line values win over imported ones.
pub fn resolve_environment(global: &GlobalOptions) -> Result<ResolvedEnvironment, CliError> {
    let working_dir = env::current_dir()?;
    let settings = load_settings(global, &working_dir)?;

    let mut initial = Vec::new();
    initial.extend(global.command_line_source());
    initial.extend(settings.initial_source());

    if initial.is_empty() {
        global
            .logger
            .warn("Nothing to resolve: no imports configured and no properties set");
    }

    let importer = settings.standard_importer(&working_dir, global.logger);
    let resolved =
        ConfigEnvironment::new(importer).resolve(initial, &settings.explicit_profiles())?;

    global.logger.debug(&format!(
        "Resolved {} property source(s) with profiles [{}]",
        resolved.property_sources().len(),
        resolved.profiles().accepted().join(", ")
    ));
    Ok(resolved)
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
