//! The result of loading one resolved location.

use crate::source::PropertySource;

/// Property sources loaded from one resource.
///
/// The first source has the highest precedence within the bundle. A loader
/// may return zero sources (an empty file), one, or several (one per
/// document of a multi-document file).
///
/// # Examples
///
/// ```
/// use stratum::{ConfigurationBundle, PropertySource};
///
/// let bundle = ConfigurationBundle::new(vec![PropertySource::new("app.yaml")]);
/// assert_eq!(bundle.property_sources().len(), 1);
/// assert!(!bundle.is_profile_specific());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationBundle {
    property_sources: Vec<PropertySource>,
    profile_specific: bool,
}

impl ConfigurationBundle {
    /// A bundle that applies regardless of profiles.
    #[must_use]
    pub fn new(property_sources: Vec<PropertySource>) -> Self {
        Self {
            property_sources,
            profile_specific: false,
        }
    }

    /// A bundle loaded for a specific profile.
    #[must_use]
    pub fn profile_specific(property_sources: Vec<PropertySource>) -> Self {
        Self {
            property_sources,
            profile_specific: true,
        }
    }

    /// The bundle's sources, highest precedence first.
    #[must_use]
    pub fn property_sources(&self) -> &[PropertySource] {
        &self.property_sources
    }

    /// Whether the bundle came from a profile-specific resource.
    #[must_use]
    pub fn is_profile_specific(&self) -> bool {
        self.profile_specific
    }

    /// Whether the bundle holds no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_sources.is_empty()
    }

    /// Consume the bundle, returning its sources.
    #[must_use]
    pub fn into_property_sources(self) -> Vec<PropertySource> {
        self.property_sources
    }
}
