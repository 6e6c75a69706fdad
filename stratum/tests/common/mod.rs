//! Common test utilities for integration tests.
//!
//! [`MemoryResources`] serves canned property sources through the
//! [`LocationResolver`] and [`Loader`] traits and records every call, so
//! tests can drive full resolution runs without touching the file system.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use stratum::{
    ConfigurationBundle, Error, ImportLocation, Importer, Loader, LocationResolver, Logger,
    NotFoundAction, ProfileSet, PropertySource, ResolvedLocation, ResolverContext, Result,
};

const SCHEME: &str = "memory:";

/// One collaborator call, as seen by [`MemoryResources`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Call {
    /// `resolve` for a location, with the profiles known at the time.
    Resolve {
        location: String,
        profiles_known: bool,
    },
    /// `resolve_profile_specific` for a location.
    ResolveProfileSpecific { location: String },
    /// `load` for a resource.
    Load { resource: String },
}

#[derive(Default)]
struct Inner {
    resources: BTreeMap<String, Vec<PropertySource>>,
    variants: BTreeMap<(String, String), Vec<PropertySource>>,
    calls: Mutex<Vec<Call>>,
}

/// In-memory resources keyed by declared location.
#[derive(Clone, Default)]
pub struct MemoryResources {
    inner: Arc<Inner>,
}

#[allow(dead_code)]
impl MemoryResources {
    /// No resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `sources` for `location`, highest precedence first.
    pub fn with(mut self, location: &str, sources: Vec<PropertySource>) -> Self {
        self.inner_mut()
            .resources
            .insert(location.to_string(), sources);
        self
    }

    /// Serve `sources` for `location` when `profile` is accepted.
    pub fn with_profile(
        mut self,
        location: &str,
        profile: &str,
        sources: Vec<PropertySource>,
    ) -> Self {
        self.inner_mut()
            .variants
            .insert((location.to_string(), profile.to_string()), sources);
        self
    }

    /// An importer backed by these resources.
    pub fn importer(&self, not_found: NotFoundAction) -> Importer {
        Importer::new(not_found, Logger::quiet())
            .with_resolver(self.clone())
            .with_loader(self.clone())
    }

    /// Every call seen so far.
    pub fn calls(&self) -> Vec<Call> {
        self.inner
            .calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn inner_mut(&mut self) -> &mut Inner {
        Arc::get_mut(&mut self.inner).expect("resources are configured before sharing")
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.inner.calls.lock() {
            calls.push(call);
        }
    }
}

impl LocationResolver for MemoryResources {
    fn is_resolvable(&self, _context: &ResolverContext, _location: &ImportLocation) -> bool {
        true
    }

    fn resolve(
        &self,
        context: &ResolverContext,
        location: &ImportLocation,
    ) -> Result<Vec<ResolvedLocation>> {
        self.record(Call::Resolve {
            location: location.value().to_string(),
            profiles_known: context.profiles().is_some(),
        });
        if self.inner.resources.contains_key(location.value()) {
            Ok(vec![ResolvedLocation::new(
                location.clone(),
                format!("{SCHEME}{}", location.value()),
            )])
        } else {
            Err(Error::location_not_found(location.to_string()))
        }
    }

    fn resolve_profile_specific(
        &self,
        _context: &ResolverContext,
        location: &ImportLocation,
        profiles: &ProfileSet,
    ) -> Result<Vec<ResolvedLocation>> {
        self.record(Call::ResolveProfileSpecific {
            location: location.value().to_string(),
        });
        Ok(profiles
            .iter()
            .filter(|profile| {
                self.inner
                    .variants
                    .contains_key(&(location.value().to_string(), (*profile).to_string()))
            })
            .map(|profile| {
                ResolvedLocation::profile_specific(
                    location.clone(),
                    format!("{SCHEME}{}#{profile}", location.value()),
                    profile,
                )
            })
            .collect())
    }
}

impl Loader for MemoryResources {
    fn is_loadable(&self, resource: &ResolvedLocation) -> bool {
        resource.resource().starts_with(SCHEME)
    }

    fn load(&self, resource: &ResolvedLocation) -> Result<ConfigurationBundle> {
        self.record(Call::Load {
            resource: resource.resource().to_string(),
        });
        let key = resource.location().value().to_string();
        let found = match resource.profile() {
            Some(profile) => self
                .inner
                .variants
                .get(&(key, profile.to_string()))
                .cloned()
                .map(ConfigurationBundle::profile_specific),
            None => self
                .inner
                .resources
                .get(&key)
                .cloned()
                .map(ConfigurationBundle::new),
        };
        found.ok_or_else(|| Error::location_not_found(resource.location().to_string()))
    }
}

/// Shorthand for a property source built from pairs.
#[allow(dead_code)]
pub fn source(name: &str, pairs: &[(&str, &str)]) -> PropertySource {
    PropertySource::from_pairs(name, pairs.iter().copied())
}

/// Names of the final property sources, highest precedence first.
#[allow(dead_code)]
pub fn source_names(resolved: &stratum::ResolvedEnvironment) -> Vec<String> {
    resolved
        .property_sources()
        .iter()
        .map(|s| s.name().to_string())
        .collect()
}
