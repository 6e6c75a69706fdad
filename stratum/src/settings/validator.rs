//! Settings validation.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::location::ImportLocation;
use crate::settings::schema::{ProfileSettings, Settings};

/// Characters that would make a profile name ambiguous inside a list or
/// a profile expression.
const RESERVED_PROFILE_CHARS: [char; 6] = [',', '(', ')', '&', '|', '!'];

/// Validates settings before they are handed to the engine.
///
/// # Examples
///
/// ```
/// use stratum::settings::{Settings, SettingsValidator};
///
/// let settings = Settings::default();
/// SettingsValidator::validate(&settings).unwrap();
/// ```
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate complete settings.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::Validation`] found.
    pub fn validate(settings: &Settings) -> Result<()> {
        if let Some(profiles) = &settings.profiles {
            Self::validate_profiles(profiles)?;
        }

        if let Some(base_dir) = &settings.base_dir {
            Self::validate_path("base_dir", base_dir)?;
        }

        if let Some(roots) = &settings.resource_roots {
            for (i, root) in roots.iter().enumerate() {
                Self::validate_path(&format!("resource_roots[{i}]"), root)?;
            }
        }

        if let Some(imports) = &settings.imports {
            Self::validate_imports(imports)?;
        }

        Ok(())
    }

    fn validate_profiles(profiles: &ProfileSettings) -> Result<()> {
        let lists = [
            ("profiles.active", &profiles.active),
            ("profiles.default", &profiles.default),
            ("profiles.additional", &profiles.additional),
        ];
        for (field, list) in lists {
            let Some(list) = list else { continue };
            for (i, name) in list.iter().enumerate() {
                Self::validate_profile_name(&format!("{field}[{i}]"), name)?;
            }
        }
        Ok(())
    }

    /// Profile names must be non-blank, free of whitespace, null bytes and
    /// expression operators, and at most 255 characters.
    fn validate_profile_name(field: &str, name: &str) -> Result<()> {
        let invalid = |message: String| Error::Validation {
            field: field.into(),
            message,
        };

        if name.trim().is_empty() {
            return Err(invalid("Profile name cannot be empty".into()));
        }
        if name.len() > 255 {
            return Err(invalid("Profile name cannot exceed 255 characters".into()));
        }
        if let Some(c) = name
            .chars()
            .find(|c| c.is_whitespace() || *c == '\0' || RESERVED_PROFILE_CHARS.contains(c))
        {
            return Err(invalid(format!(
                "Profile name '{name}' contains invalid character {c:?}"
            )));
        }
        Ok(())
    }

    fn validate_path(field: &str, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Path cannot be empty".into(),
            });
        }
        Ok(())
    }

    fn validate_imports(imports: &[String]) -> Result<()> {
        let mut seen = HashSet::new();
        for (i, import) in imports.iter().enumerate() {
            let field = format!("imports[{i}]");
            ImportLocation::parse(import).map_err(|e| Error::Validation {
                field: field.clone(),
                message: e.to_string(),
            })?;
            if !seen.insert(import.trim()) {
                return Err(Error::Validation {
                    field,
                    message: format!("Duplicate import '{import}'"),
                });
            }
        }
        Ok(())
    }
}
