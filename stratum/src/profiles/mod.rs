//! Profile sets and profile expressions.
//!
//! A [`ProfileSet`] records the active, default and accepted profiles of a
//! resolution run. Explicit settings win over bound configuration; when the
//! caller leaves a list at its "unset" value the list is bound from
//! `profiles.active` / `profiles.default` instead.
//!
//! # Examples
//!
//! ```
//! use stratum::ProfileSet;
//!
//! let profiles = ProfileSet::new(vec!["a".into(), "b".into(), "a".into()], vec![]);
//! assert_eq!(profiles.active(), ["a", "b"]);
//! assert_eq!(profiles.accepted(), ["a", "b"]);
//! ```

mod expression;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::binder::CompositeBinder;
use crate::error::Result;
use crate::keys;

pub use expression::ProfileExpression;

/// The default profile list when nothing was configured.
pub const DEFAULT_PROFILE: &str = "default";

/// Profile settings supplied by the caller rather than bound from sources.
///
/// `active` is unset when empty and `default` is unset when it equals
/// `["default"]`; unset lists are bound from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitProfiles {
    /// Explicitly active profiles.
    pub active: Vec<String>,
    /// Explicit default profiles.
    pub default: Vec<String>,
    /// Profiles always merged into the active list.
    pub additional: Vec<String>,
}

impl Default for ExplicitProfiles {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            default: vec![DEFAULT_PROFILE.to_string()],
            additional: Vec::new(),
        }
    }
}

impl ExplicitProfiles {
    /// Explicit settings with the given active profiles.
    #[must_use]
    pub fn with_active<I, S>(active: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: active.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Computed active, default and accepted profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSet {
    active: Vec<String>,
    default: Vec<String>,
    accepted: Vec<String>,
}

impl ProfileSet {
    /// Build a profile set directly from lists.
    ///
    /// Both lists are deduplicated keeping first occurrences.
    #[must_use]
    pub fn new(active: Vec<String>, default: Vec<String>) -> Self {
        let active = unique(active);
        let default = unique(default);
        let accepted = unique(if active.is_empty() {
            default.clone()
        } else {
            active.clone()
        });
        Self {
            active,
            default,
            accepted,
        }
    }

    /// Compute the profile set from explicit settings and bound configuration.
    ///
    /// `additional_active` is merged into the active list whether that list
    /// was explicit or bound. The computation has no side effects; calling it
    /// again with the same inputs yields the same set.
    ///
    /// # Errors
    ///
    /// Returns any binding failure raised by `binder`.
    pub fn compute(
        explicit_active: &[String],
        explicit_default: &[String],
        binder: &CompositeBinder<'_>,
        additional_active: &[String],
    ) -> Result<Self> {
        let mut active = if has_explicit(explicit_active, &[]) {
            explicit_active.to_vec()
        } else {
            bind_profiles(binder, keys::PROFILES_ACTIVE)?.unwrap_or_default()
        };
        active.extend(additional_active.iter().cloned());

        let default = if has_explicit(explicit_default, &[DEFAULT_PROFILE]) {
            explicit_default.to_vec()
        } else {
            bind_profiles(binder, keys::PROFILES_DEFAULT)?
                .unwrap_or_else(|| vec![DEFAULT_PROFILE.to_string()])
        };

        Ok(Self::new(active, default))
    }

    /// The active profiles.
    #[must_use]
    pub fn active(&self) -> &[String] {
        &self.active
    }

    /// The default profiles.
    #[must_use]
    pub fn defaults(&self) -> &[String] {
        &self.default
    }

    /// The accepted profiles: active if any, otherwise default.
    #[must_use]
    pub fn accepted(&self) -> &[String] {
        &self.accepted
    }

    /// Whether `profile` is accepted.
    #[must_use]
    pub fn is_accepted(&self, profile: &str) -> bool {
        self.accepted.iter().any(|p| p == profile)
    }

    /// Iterate over the accepted profiles.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }
}

impl fmt::Display for ProfileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "active={:?}, default={:?}, accepted={:?}",
            self.active, self.default, self.accepted
        )
    }
}

/// Bind a profile list, dropping blank entries.
pub(crate) fn bind_profiles(binder: &CompositeBinder<'_>, name: &str) -> Result<Option<Vec<String>>> {
    Ok(binder.get_list(name)?.map(|items| {
        items
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }))
}

fn has_explicit(explicit: &[String], unset: &[&str]) -> bool {
    let explicit: HashSet<&str> = explicit.iter().map(String::as_str).collect();
    let unset: HashSet<&str> = unset.iter().copied().collect();
    explicit != unset
}

fn unique(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::BinderOptions;
    use crate::contributor::ContributorTree;
    use crate::source::PropertySource;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn tree(source: PropertySource) -> ContributorTree {
        ContributorTree::from_property_sources(vec![source]).unwrap()
    }

    #[test]
    fn test_active_deduplicated() {
        let profiles = ProfileSet::new(strings(&["a", "b", "a"]), vec![]);
        assert_eq!(profiles.active(), strings(&["a", "b"]));
    }

    #[test]
    fn test_accepted_falls_back_to_default() {
        let profiles = ProfileSet::new(vec![], strings(&["default", "default"]));
        assert_eq!(profiles.accepted(), strings(&["default"]));
        assert!(profiles.is_accepted("default"));
        assert!(!profiles.is_accepted("prod"));
    }

    #[test]
    fn test_compute_binds_when_unset() {
        let tree = tree(
            PropertySource::new("s")
                .with_property("profiles.active", "prod, eu")
                .with_property("profiles.default", "local"),
        );
        let binder = tree.binder(None, BinderOptions::default());
        let profiles =
            ProfileSet::compute(&[], &strings(&["default"]), &binder, &[]).unwrap();

        assert_eq!(profiles.active(), strings(&["prod", "eu"]));
        assert_eq!(profiles.defaults(), strings(&["local"]));
        assert_eq!(profiles.accepted(), strings(&["prod", "eu"]));
    }

    #[test]
    fn test_compute_explicit_wins() {
        let tree = tree(PropertySource::new("s").with_property("profiles.active", "prod"));
        let binder = tree.binder(None, BinderOptions::default());
        let profiles = ProfileSet::compute(
            &strings(&["dev", "dev"]),
            &strings(&["fallback"]),
            &binder,
            &strings(&["extra"]),
        )
        .unwrap();

        assert_eq!(profiles.active(), strings(&["dev", "extra"]));
        assert_eq!(profiles.defaults(), strings(&["fallback"]));
    }

    #[test]
    fn test_compute_additional_merged_into_bound() {
        let tree = tree(PropertySource::new("s").with_property("profiles.active", "prod"));
        let binder = tree.binder(None, BinderOptions::default());
        let profiles =
            ProfileSet::compute(&[], &strings(&["default"]), &binder, &strings(&["prod", "x"]))
                .unwrap();
        assert_eq!(profiles.active(), strings(&["prod", "x"]));
    }

    #[test]
    fn test_compute_defaults_when_nothing_bound() {
        let tree = tree(PropertySource::new("s"));
        let binder = tree.binder(None, BinderOptions::default());
        let profiles = ProfileSet::compute(&[], &strings(&["default"]), &binder, &[]).unwrap();

        assert!(profiles.active().is_empty());
        assert_eq!(profiles.accepted(), strings(&["default"]));
    }

    #[test]
    fn test_compute_is_repeatable() {
        let tree = tree(PropertySource::new("s").with_property("profiles.active", "b,a,b"));
        let binder = tree.binder(None, BinderOptions::default());
        let first = ProfileSet::compute(&[], &strings(&["default"]), &binder, &[]).unwrap();
        let second = ProfileSet::compute(&[], &strings(&["default"]), &binder, &[]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.active(), strings(&["b", "a"]));
    }

    #[test]
    fn test_explicit_profiles_default() {
        let explicit = ExplicitProfiles::default();
        assert!(explicit.active.is_empty());
        assert_eq!(explicit.default, strings(&["default"]));
        assert_eq!(ExplicitProfiles::with_active(["x"]).active, strings(&["x"]));
    }

    #[test]
    fn test_display() {
        let profiles = ProfileSet::new(strings(&["prod"]), strings(&["default"]));
        assert_eq!(
            profiles.to_string(),
            r#"active=["prod"], default=["default"], accepted=["prod"]"#
        );
    }
}
