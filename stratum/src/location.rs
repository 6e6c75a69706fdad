//! Import locations, before and after resolution.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};

const OPTIONAL_PREFIX: &str = "optional:";

/// A location string declared by `config.import`.
///
/// An `optional:` prefix marks the location as optional: when it cannot be
/// found the import contributes nothing, whatever the not-found policy says.
///
/// # Examples
///
/// ```
/// use stratum::ImportLocation;
///
/// let location = ImportLocation::parse("optional:file:./local.yaml").unwrap();
/// assert!(location.is_optional());
/// assert_eq!(location.value(), "file:./local.yaml");
/// assert_eq!(location.to_string(), "optional:file:./local.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImportLocation {
    value: String,
    optional: bool,
}

impl ImportLocation {
    /// Parse a declared location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the location is empty.
    pub fn parse(declared: &str) -> Result<Self> {
        let trimmed = declared.trim();
        let (optional, value) = match trimmed.strip_prefix(OPTIONAL_PREFIX) {
            Some(rest) => (true, rest.trim()),
            None => (false, trimmed),
        };

        if value.is_empty() {
            return Err(Error::Binding {
                name: crate::keys::IMPORT.to_string(),
                message: format!("empty import location '{declared}'"),
            });
        }

        Ok(Self {
            value: value.to_string(),
            optional,
        })
    }

    /// The location without the `optional:` prefix.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether a missing resource for this location is always ignored.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the location starts with the given scheme prefix (e.g. `classpath:`).
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.value.starts_with(prefix)
    }

    /// The location with `prefix` removed, if it was present.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &str) -> Option<&str> {
        self.value.strip_prefix(prefix)
    }
}

impl fmt::Display for ImportLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{OPTIONAL_PREFIX}")?;
        }
        write!(f, "{}", self.value)
    }
}

/// One physical resource an [`ImportLocation`] resolved to.
///
/// The resource string is the identity used to load each resource at most
/// once per resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedLocation {
    location: ImportLocation,
    resource: String,
    profile: Option<String>,
}

impl ResolvedLocation {
    /// A resource that applies regardless of profiles.
    #[must_use]
    pub fn new(location: ImportLocation, resource: impl Into<String>) -> Self {
        Self {
            location,
            resource: resource.into(),
            profile: None,
        }
    }

    /// A resource that only applies when `profile` is accepted.
    #[must_use]
    pub fn profile_specific(
        location: ImportLocation,
        resource: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            location,
            resource: resource.into(),
            profile: Some(profile.into()),
        }
    }

    /// The declared location this resource came from.
    #[must_use]
    pub fn location(&self) -> &ImportLocation {
        &self.location
    }

    /// The resource identity.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The profile this resource is specific to.
    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// The filesystem path for `file:` resources.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        self.resource.strip_prefix("file:").map(PathBuf::from)
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        if let Some(profile) = &self.profile {
            write!(f, " [profile {profile}]")?;
        }
        Ok(())
    }
}
