//! Settings for the resolution engine itself.
//!
//! This module provides hierarchical settings with support for:
//! - YAML settings files (user settings and project files)
//! - Environment variable overrides
//! - Programmatic overrides via the builder
//! - Validation of the merged result
//!
//! # Settings Precedence
//!
//! Settings are merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `SettingsBuilder::with_settings`)
//! 2. Environment variables (`STRATUM_*`)
//! 3. Private project settings (`stratum.local.yaml`)
//! 4. Project settings (`stratum.yaml`)
//! 5. User settings (`~/.stratum/settings.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use stratum::settings::SettingsBuilder;
//! use stratum::Logger;
//! use std::path::Path;
//!
//! let settings = SettingsBuilder::new()
//!     .with_working_dir(Path::new("/path/to/project"))
//!     .build()
//!     .unwrap();
//!
//! let importer = settings.standard_importer(Path::new("/path/to/project"), Logger::quiet());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::{SettingsBuilder, SETTINGS_SOURCE_NAME};
pub use environment::SettingsEnvironment;
pub use loader::{default_settings_dir, SettingsLoader, SettingsSource};
pub use merger::SettingsMerger;
pub use schema::{ProfileSettings, Settings};
pub use validator::SettingsValidator;
