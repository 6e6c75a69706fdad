//! Import phases and the activation context.

use std::fmt;

use serde::Serialize;

use crate::profiles::ProfileSet;

/// The stage in which a contributor's imports are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportPhase {
    /// Profiles are not known yet.
    BeforeProfileActivation,
    /// Profiles have been computed.
    AfterProfileActivation,
}

impl ImportPhase {
    /// Phases in tree traversal order.
    ///
    /// Children imported after profile activation are visited first so that
    /// profile-specific content takes precedence.
    pub const TRAVERSAL_ORDER: [ImportPhase; 2] = [
        ImportPhase::AfterProfileActivation,
        ImportPhase::BeforeProfileActivation,
    ];

    /// The phase implied by an optional activation context.
    #[must_use]
    pub fn of(context: Option<&ActivationContext>) -> Self {
        context.map_or(Self::BeforeProfileActivation, ActivationContext::import_phase)
    }
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeProfileActivation => write!(f, "before-profile-activation"),
            Self::AfterProfileActivation => write!(f, "after-profile-activation"),
        }
    }
}

/// What is currently known about profiles, plus the phase in effect.
///
/// # Examples
///
/// ```
/// use stratum::{ActivationContext, ImportPhase, ProfileSet};
///
/// let context = ActivationContext::new();
/// assert_eq!(context.import_phase(), ImportPhase::BeforeProfileActivation);
///
/// let context = context.with_profiles(ProfileSet::new(vec!["prod".into()], vec![]));
/// assert_eq!(context.import_phase(), ImportPhase::AfterProfileActivation);
/// assert!(context.profiles().unwrap().is_accepted("prod"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationContext {
    profiles: Option<ProfileSet>,
    import_phase: ImportPhase,
}

impl ActivationContext {
    /// A context in which profiles are not known yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: None,
            import_phase: ImportPhase::BeforeProfileActivation,
        }
    }

    /// Move to the post-activation phase with the computed profiles.
    #[must_use]
    pub fn with_profiles(self, profiles: ProfileSet) -> Self {
        Self {
            profiles: Some(profiles),
            import_phase: ImportPhase::AfterProfileActivation,
        }
    }

    /// The computed profiles, if known.
    #[must_use]
    pub fn profiles(&self) -> Option<&ProfileSet> {
        self.profiles.as_ref()
    }

    /// The phase being processed.
    #[must_use]
    pub fn import_phase(&self) -> ImportPhase {
        self.import_phase
    }
}

impl Default for ActivationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.profiles {
            Some(profiles) => write!(f, "{} ({profiles})", self.import_phase),
            None => write!(f, "{} (profiles unknown)", self.import_phase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_of_missing_context() {
        assert_eq!(ImportPhase::of(None), ImportPhase::BeforeProfileActivation);
    }

    #[test]
    fn test_phase_follows_profiles() {
        let context = ActivationContext::default();
        assert_eq!(
            ImportPhase::of(Some(&context)),
            ImportPhase::BeforeProfileActivation
        );
        let context = context.with_profiles(ProfileSet::new(vec![], vec!["default".into()]));
        assert_eq!(
            ImportPhase::of(Some(&context)),
            ImportPhase::AfterProfileActivation
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ActivationContext::new().to_string(),
            "before-profile-activation (profiles unknown)"
        );
    }
}
