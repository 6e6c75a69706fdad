//! Error types for the stratum library.
//!
//! This module provides the error hierarchy for configuration resolution,
//! using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a stratum error.
///
/// # Examples
///
/// ```
/// use stratum::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("config.import".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the stratum library.
///
/// Every variant except [`Error::LocationNotFound`] is fatal to a resolution
/// run. A missing location is handed to the configured
/// [`NotFoundAction`](crate::import::NotFoundAction) first.
#[derive(Debug, Error)]
pub enum Error {
    /// An import location has no matching resource.
    #[error("config location not found: {location}{}", reason_suffix(.reason))]
    LocationNotFound {
        /// The location that could not be found.
        location: String,
        /// Optional detail from the resolver or loader.
        reason: Option<String>,
    },

    /// No registered resolver understands the location.
    #[error("unsupported config location '{location}': {reason}")]
    UnsupportedLocation {
        /// The location that could not be resolved.
        location: String,
        /// Why the location is not supported.
        reason: String,
    },

    /// A declared property could not be bound to its expected shape.
    #[error("failed to bind property '{name}': {message}")]
    Binding {
        /// The property being bound.
        name: String,
        /// A description of the failure.
        message: String,
    },

    /// A bound value was found in a contributor that is not active.
    #[error("inactive property source '{contributor}' cannot contain property '{property}'")]
    InactiveSource {
        /// The property that was bound.
        property: String,
        /// The inactive contributor holding the property.
        contributor: String,
    },

    /// Placeholder substitution looped back on itself.
    #[error("circular placeholder reference: {}", .chain.join(" -> "))]
    PlaceholderCycle {
        /// The chain of property names forming the cycle.
        chain: Vec<String>,
    },

    /// A profile-specific or profile-gated source declares a profile property.
    #[error("property '{property}' is invalid in profile-specific source '{contributor}'")]
    InvalidProperty {
        /// The offending property.
        property: String,
        /// The contributor that declared it.
        contributor: String,
    },

    /// A resource was found but could not be loaded.
    #[error("failed to load '{resource}': {message}")]
    Load {
        /// The resource identity.
        resource: String,
        /// A description of the failure.
        message: String,
    },

    /// An import triggered by a contributor failed.
    #[error("import from '{contributor}' failed: {source}")]
    Import {
        /// The contributor whose imports were being processed.
        contributor: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// A collaborator reported a failure the engine does not interpret.
    #[error("{location}: {source}")]
    Collaborator {
        /// The location being handled when the failure happened.
        location: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A settings file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" ({r})"))
        .unwrap_or_default()
}

impl Error {
    /// Create a [`Error::LocationNotFound`] without further detail.
    #[must_use]
    pub fn location_not_found(location: impl Into<String>) -> Self {
        Self::LocationNotFound {
            location: location.into(),
            reason: None,
        }
    }

    /// Wrap a failure from a custom resolver or loader.
    ///
    /// The engine passes these through unchanged, adding only the
    /// contributor whose import triggered them.
    #[must_use]
    pub fn collaborator(
        location: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Collaborator {
            location: location.into(),
            source: source.into(),
        }
    }

    /// Check if error indicates a missing location.
    ///
    /// Looks through [`Error::Import`] wrappers.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum::Error;
    ///
    /// let err = Error::location_not_found("classpath:missing.yaml");
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::LocationNotFound { .. } => true,
            Self::Import { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if error is a placeholder cycle.
    #[must_use]
    pub fn is_placeholder_cycle(&self) -> bool {
        matches!(self, Self::PlaceholderCycle { .. })
    }

    /// Check if error is an inactive source violation.
    #[must_use]
    pub fn is_inactive_source(&self) -> bool {
        matches!(self, Self::InactiveSource { .. })
    }

    /// Wrap this error with the contributor that triggered the import.
    ///
    /// Missing locations pass through unwrapped so callers can match on them
    /// directly.
    #[must_use]
    pub fn in_contributor(self, contributor: impl Into<String>) -> Self {
        match self {
            err @ (Self::LocationNotFound { .. } | Self::Import { .. }) => err,
            other => Self::Import {
                contributor: contributor.into(),
                source: Box::new(other),
            },
        }
    }
}
