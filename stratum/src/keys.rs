//! Property names the engine itself binds.

/// Import locations declared by a source.
pub const IMPORT: &str = "config.import";

/// Profile expression gating the declaring source.
pub const ACTIVATE_ON_PROFILE: &str = "config.activate.on-profile";

/// Active profiles.
pub const PROFILES_ACTIVE: &str = "profiles.active";

/// Default profiles, used when no profile is active.
pub const PROFILES_DEFAULT: &str = "profiles.default";

/// Profiles merged into the active list.
pub const PROFILES_INCLUDE: &str = "profiles.include";

/// Properties a profile-specific or profile-gated source may not declare.
pub const PROFILE_SPECIFIC_FORBIDDEN: [&str; 3] =
    [PROFILES_ACTIVE, PROFILES_DEFAULT, PROFILES_INCLUDE];
