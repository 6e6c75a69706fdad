//! Resolving and loading import locations.
//!
//! The engine never touches files itself. It hands declared
//! [`ImportLocation`]s to an [`Importer`], which asks the registered
//! [`LocationResolver`]s to turn each location into concrete
//! [`ResolvedLocation`]s and the registered [`Loader`]s to turn those into
//! [`ConfigurationBundle`]s.
//!
//! Resolvers and loaders are tried in registration order; the first one
//! that accepts a location or resource handles it.

mod not_found;
mod properties;
mod standard;
mod yaml;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::bundle::ConfigurationBundle;
use crate::error::{Error, Result};
use crate::location::{ImportLocation, ResolvedLocation};
use crate::logging::Logger;
use crate::profiles::ProfileSet;
use crate::source::PropertySource;

pub use not_found::NotFoundAction;
pub use properties::PropertiesLoader;
pub use standard::StandardLocationResolver;
pub use yaml::YamlLoader;

/// What a resolver knows about the import being resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverContext {
    parent: Option<ResolvedLocation>,
    profiles: Option<ProfileSet>,
}

impl ResolverContext {
    /// A context for imports declared by `parent` under `profiles`.
    #[must_use]
    pub fn new(parent: Option<ResolvedLocation>, profiles: Option<ProfileSet>) -> Self {
        Self { parent, profiles }
    }

    /// The resource that declared the import, if it was itself imported.
    #[must_use]
    pub fn parent(&self) -> Option<&ResolvedLocation> {
        self.parent.as_ref()
    }

    /// The computed profiles, once known.
    #[must_use]
    pub fn profiles(&self) -> Option<&ProfileSet> {
        self.profiles.as_ref()
    }
}

/// Turns a declared location into concrete resources.
#[cfg_attr(test, mockall::automock)]
pub trait LocationResolver: Send + Sync {
    /// Whether this resolver understands `location`.
    fn is_resolvable(&self, context: &ResolverContext, location: &ImportLocation) -> bool;

    /// Resolve the resources that apply regardless of profiles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocationNotFound`] when nothing exists at the
    /// location; any other error is fatal.
    fn resolve(
        &self,
        context: &ResolverContext,
        location: &ImportLocation,
    ) -> Result<Vec<ResolvedLocation>>;

    /// Resolve the resources that only apply to `profiles`.
    ///
    /// Only called once profiles are known.
    ///
    /// # Errors
    ///
    /// Same contract as [`LocationResolver::resolve`].
    fn resolve_profile_specific(
        &self,
        _context: &ResolverContext,
        _location: &ImportLocation,
        _profiles: &ProfileSet,
    ) -> Result<Vec<ResolvedLocation>> {
        Ok(Vec::new())
    }
}

/// Turns a resolved resource into property sources.
#[cfg_attr(test, mockall::automock)]
pub trait Loader: Send + Sync {
    /// Whether this loader can read `resource`.
    fn is_loadable(&self, resource: &ResolvedLocation) -> bool;

    /// Load the resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LocationNotFound`] when the resource vanished and
    /// [`Error::Load`] when it cannot be parsed.
    fn load(&self, resource: &ResolvedLocation) -> Result<ConfigurationBundle>;
}

/// One resource and the bundle loaded from it.
#[derive(Debug, Clone)]
pub struct LoadedResource {
    /// The resource.
    pub resolved: ResolvedLocation,
    /// What it contained.
    pub bundle: ConfigurationBundle,
}

/// Read a `file:` resource into a string.
///
/// A vanished file is reported as not found so the policy applies.
fn read_resource(resource: &ResolvedLocation) -> Result<String> {
    let path = resource.file_path().ok_or_else(|| Error::Load {
        resource: resource.resource().to_string(),
        message: "only file resources can be read".to_string(),
    })?;
    std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::LocationNotFound {
            location: resource.location().to_string(),
            reason: Some(format!("{} does not exist", path.display())),
        },
        _ => Error::Load {
            resource: resource.resource().to_string(),
            message: e.to_string(),
        },
    })
}

/// Property source name for document `index` of `total` in `resource`.
fn source_name(resource: &ResolvedLocation, index: usize, total: usize) -> String {
    let base = format!(
        "Config resource '{}' via location '{}'",
        resource.resource(),
        resource.location()
    );
    if total > 1 {
        format!("{base} (document #{index})")
    } else {
        base
    }
}

/// Name and order a loaded file's documents.
///
/// Later documents take precedence, so they come first in the bundle.
fn into_bundle(
    resource: &ResolvedLocation,
    documents: Vec<Vec<(String, String)>>,
) -> ConfigurationBundle {
    let total = documents.len();
    let sources = documents
        .into_iter()
        .enumerate()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(index, entries)| {
            PropertySource::from_pairs(source_name(resource, index, total), entries)
                .with_origin(resource.resource())
        })
        .rev()
        .collect();
    if resource.profile().is_some() {
        ConfigurationBundle::profile_specific(sources)
    } else {
        ConfigurationBundle::new(sources)
    }
}

/// Composes resolvers and loaders and applies the not-found policy.
pub struct Importer {
    resolvers: Vec<Box<dyn LocationResolver>>,
    loaders: Vec<Box<dyn Loader>>,
    not_found: NotFoundAction,
    logger: Logger,
}

impl Importer {
    /// An importer with no collaborators and the given policy.
    #[must_use]
    pub fn new(not_found: NotFoundAction, logger: Logger) -> Self {
        Self {
            resolvers: Vec::new(),
            loaders: Vec::new(),
            not_found,
            logger,
        }
    }

    /// An importer wired with the file/classpath resolver and the
    /// properties and YAML loaders.
    #[must_use]
    pub fn standard(
        base_dir: PathBuf,
        resource_roots: Vec<PathBuf>,
        not_found: NotFoundAction,
        logger: Logger,
    ) -> Self {
        Self::new(not_found, logger)
            .with_resolver(StandardLocationResolver::new(base_dir, resource_roots))
            .with_loader(PropertiesLoader)
            .with_loader(YamlLoader)
    }

    /// Register a resolver after the existing ones.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl LocationResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Register a loader after the existing ones.
    #[must_use]
    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    /// The not-found policy.
    #[must_use]
    pub fn not_found_action(&self) -> NotFoundAction {
        self.not_found
    }

    /// The logger used for import diagnostics.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Resolve and load `locations`.
    ///
    /// Resources whose identity is in `loaded`, or that appear twice in this
    /// call, are skipped. The result lists declared locations in order, each
    /// base resource before its profile-specific variants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedLocation`] when no collaborator accepts a
    /// location or resource, [`Error::LocationNotFound`] when the policy
    /// does not ignore a miss, and any other collaborator failure.
    pub fn resolve_and_load(
        &self,
        context: &ResolverContext,
        locations: &[ImportLocation],
        loaded: &HashSet<&str>,
    ) -> Result<Vec<LoadedResource>> {
        let mut resolved = Vec::new();
        for location in locations {
            let resolver = self.resolver_for(context, location)?;
            match resolver.resolve(context, location) {
                Ok(found) => resolved.extend(found),
                Err(err) if err.is_not_found() => {
                    self.not_found.handle(&self.logger, location, err)?;
                }
                Err(err) => return Err(err),
            }
            // Variants load even when a missing base was ignored.
            if let Some(profiles) = context.profiles() {
                resolved.extend(resolver.resolve_profile_specific(context, location, profiles)?);
            }
        }

        let mut seen: HashSet<String> = loaded.iter().map(|r| (*r).to_string()).collect();
        let mut result = Vec::with_capacity(resolved.len());
        for resource in resolved {
            if !seen.insert(resource.resource().to_string()) {
                self.logger
                    .trace(&format!("Skipping already loaded resource {resource}"));
                continue;
            }
            match self.load(&resource) {
                Ok(bundle) => {
                    self.logger.debug(&format!(
                        "Loaded {} property source(s) from {resource}",
                        bundle.property_sources().len()
                    ));
                    result.push(LoadedResource {
                        resolved: resource,
                        bundle,
                    });
                }
                Err(err) if err.is_not_found() => {
                    self.not_found.handle(&self.logger, resource.location(), err)?;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(result)
    }

    fn resolver_for(
        &self,
        context: &ResolverContext,
        location: &ImportLocation,
    ) -> Result<&dyn LocationResolver> {
        self.resolvers
            .iter()
            .find(|r| r.is_resolvable(context, location))
            .map(|r| &**r)
            .ok_or_else(|| Error::UnsupportedLocation {
                location: location.to_string(),
                reason: "no resolver accepts this location".to_string(),
            })
    }

    fn load(&self, resource: &ResolvedLocation) -> Result<ConfigurationBundle> {
        let loader = self
            .loaders
            .iter()
            .find(|l| l.is_loadable(resource))
            .ok_or_else(|| Error::UnsupportedLocation {
                location: resource.location().to_string(),
                reason: format!("no loader can read resource '{}'", resource.resource()),
            })?;
        loader.load(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::always;

    fn location(text: &str) -> ImportLocation {
        ImportLocation::parse(text).unwrap()
    }

    fn echo_resolver() -> MockLocationResolver {
        let mut resolver = MockLocationResolver::new();
        resolver.expect_is_resolvable().return_const(true);
        resolver.expect_resolve().returning(|_, location| {
            Ok(vec![ResolvedLocation::new(
                location.clone(),
                format!("memory:{}", location.value()),
            )])
        });
        resolver
            .expect_resolve_profile_specific()
            .returning(|_, location, profiles| {
                Ok(profiles
                    .iter()
                    .map(|p| {
                        ResolvedLocation::profile_specific(
                            location.clone(),
                            format!("memory:{}-{p}", location.value()),
                            p,
                        )
                    })
                    .collect())
            });
        resolver
    }

    fn echo_loader() -> MockLoader {
        let mut loader = MockLoader::new();
        loader.expect_is_loadable().return_const(true);
        loader.expect_load().returning(|resource| {
            Ok(ConfigurationBundle::new(vec![PropertySource::new(
                resource.resource(),
            )]))
        });
        loader
    }

    fn importer(not_found: NotFoundAction) -> Importer {
        Importer::new(not_found, Logger::quiet())
            .with_resolver(echo_resolver())
            .with_loader(echo_loader())
    }

    fn resources(loaded: &[LoadedResource]) -> Vec<&str> {
        loaded.iter().map(|l| l.resolved.resource()).collect()
    }

    #[test]
    fn test_declaration_order_and_profile_variants() {
        let context = ResolverContext::new(
            None,
            Some(ProfileSet::new(vec!["prod".into()], vec![])),
        );
        let loaded = importer(NotFoundAction::Fail)
            .resolve_and_load(&context, &[location("a"), location("b")], &HashSet::new())
            .unwrap();
        assert_eq!(
            resources(&loaded),
            vec!["memory:a", "memory:a-prod", "memory:b", "memory:b-prod"]
        );
    }

    #[test]
    fn test_no_profile_variants_before_activation() {
        let loaded = importer(NotFoundAction::Fail)
            .resolve_and_load(&ResolverContext::default(), &[location("a")], &HashSet::new())
            .unwrap();
        assert_eq!(resources(&loaded), vec!["memory:a"]);
    }

    #[test]
    fn test_already_loaded_and_duplicates_skipped() {
        let already: HashSet<&str> = ["memory:a"].into_iter().collect();
        let loaded = importer(NotFoundAction::Fail)
            .resolve_and_load(
                &ResolverContext::default(),
                &[location("a"), location("b"), location("b")],
                &already,
            )
            .unwrap();
        assert_eq!(resources(&loaded), vec!["memory:b"]);
    }

    #[test]
    fn test_unsupported_location() {
        let mut resolver = MockLocationResolver::new();
        resolver.expect_is_resolvable().return_const(false);
        let importer = Importer::new(NotFoundAction::Ignore, Logger::quiet()).with_resolver(resolver);
        let err = importer
            .resolve_and_load(&ResolverContext::default(), &[location("x")], &HashSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedLocation { .. }));
    }

    #[test]
    fn test_not_found_policy() {
        let missing = || {
            let mut resolver = MockLocationResolver::new();
            resolver.expect_is_resolvable().return_const(true);
            resolver
                .expect_resolve()
                .with(always(), always())
                .returning(|_, location| Err(Error::location_not_found(location.to_string())));
            resolver
        };

        let fail = Importer::new(NotFoundAction::Fail, Logger::quiet()).with_resolver(missing());
        let err = fail
            .resolve_and_load(&ResolverContext::default(), &[location("x")], &HashSet::new())
            .unwrap_err();
        assert!(err.is_not_found());

        let ignore = Importer::new(NotFoundAction::Ignore, Logger::quiet()).with_resolver(missing());
        let loaded = ignore
            .resolve_and_load(&ResolverContext::default(), &[location("x")], &HashSet::new())
            .unwrap();
        assert!(loaded.is_empty());

        let optional = fail
            .resolve_and_load(
                &ResolverContext::default(),
                &[location("optional:x")],
                &HashSet::new(),
            )
            .unwrap();
        assert!(optional.is_empty());
    }

    #[test]
    fn test_profile_variants_survive_ignored_base() {
        let mut resolver = MockLocationResolver::new();
        resolver.expect_is_resolvable().return_const(true);
        resolver
            .expect_resolve()
            .returning(|_, location| Err(Error::location_not_found(location.to_string())));
        resolver
            .expect_resolve_profile_specific()
            .returning(|_, location, _| {
                Ok(vec![ResolvedLocation::profile_specific(
                    location.clone(),
                    format!("memory:{}-prod", location.value()),
                    "prod",
                )])
            });
        let context = ResolverContext::new(
            None,
            Some(ProfileSet::new(vec!["prod".into()], vec![])),
        );

        let ignore = Importer::new(NotFoundAction::Ignore, Logger::quiet())
            .with_resolver(resolver)
            .with_loader(echo_loader());
        let loaded = ignore
            .resolve_and_load(&context, &[location("a")], &HashSet::new())
            .unwrap();
        assert_eq!(resources(&loaded), vec!["memory:a-prod"]);
        assert_eq!(loaded[0].resolved.profile(), Some("prod"));
    }

    #[test]
    fn test_loader_failure_is_fatal_under_ignore() {
        let mut loader = MockLoader::new();
        loader.expect_is_loadable().return_const(true);
        loader.expect_load().returning(|resource| {
            Err(Error::Load {
                resource: resource.resource().to_string(),
                message: "bad syntax".to_string(),
            })
        });
        let importer = Importer::new(NotFoundAction::Ignore, Logger::quiet())
            .with_resolver(echo_resolver())
            .with_loader(loader);
        let err = importer
            .resolve_and_load(&ResolverContext::default(), &[location("a")], &HashSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }
}
