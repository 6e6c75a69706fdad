//! The top-level resolution entry point.
//!
//! [`ConfigEnvironment::resolve`] runs the activation lifecycle:
//!
//! 1. wrap the initial property sources in a fresh tree and process their
//!    imports with no activation context;
//! 2. keep processing with profiles unknown until the tree is exhausted;
//! 3. compute the [`ProfileSet`] from the tree, rejecting profile
//!    properties that only inactive contributors declare;
//! 4. process again with the computed profiles, which expands
//!    profile-gated contributors and pulls in profile-specific variants;
//! 5. reject profile properties in profile-specific sources and collect
//!    the active property sources in precedence order.
//!
//! Resolution is all-or-nothing: any failure aborts the run.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::activation::{ActivationContext, ImportPhase};
use crate::binder::BinderOptions;
use crate::contributor::{Contributor, ContributorTree};
use crate::driver::ResolutionDriver;
use crate::error::{Error, Result};
use crate::import::Importer;
use crate::keys;
use crate::profiles::{bind_profiles, ExplicitProfiles, ProfileSet};
use crate::source::{canonical_name, PropertySource};

/// Resolves layered configuration from initial property sources.
///
/// # Examples
///
/// ```
/// use stratum::{ConfigEnvironment, ExplicitProfiles, Importer, Logger, NotFoundAction, PropertySource};
///
/// let importer = Importer::new(NotFoundAction::Fail, Logger::quiet());
/// let environment = ConfigEnvironment::new(importer);
///
/// let resolved = environment
///     .resolve(
///         vec![PropertySource::new("defaults").with_property("app.name", "demo")],
///         &ExplicitProfiles::with_active(["dev"]),
///     )
///     .unwrap();
///
/// assert_eq!(resolved.get("app.name").unwrap().as_deref(), Some("demo"));
/// assert_eq!(resolved.profiles().active(), ["dev"]);
/// ```
pub struct ConfigEnvironment {
    importer: Importer,
}

impl ConfigEnvironment {
    /// An environment importing through `importer`.
    #[must_use]
    pub fn new(importer: Importer) -> Self {
        Self { importer }
    }

    /// The importer in use.
    #[must_use]
    pub fn importer(&self) -> &Importer {
        &self.importer
    }

    /// Resolve `initial` sources, given in precedence order.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any stage; no partial result is
    /// produced.
    pub fn resolve(
        &self,
        initial: Vec<PropertySource>,
        explicit: &ExplicitProfiles,
    ) -> Result<ResolvedEnvironment> {
        let logger = self.importer.logger();
        let driver = ResolutionDriver::new(&self.importer);

        let tree = ContributorTree::from_property_sources(initial)?;
        let tree = driver.process(tree, None)?;

        let context = ActivationContext::new();
        let tree = driver.process(tree, Some(&context))?;

        let profiles = compute_profiles(&tree, &context, explicit)?;
        logger.debug(&format!("Computed profiles: {profiles}"));

        let context = context.with_profiles(profiles.clone());
        let tree = driver.process(tree, Some(&context))?;

        check_invalid_properties(&tree)?;

        let property_sources: Vec<Arc<PropertySource>> = tree
            .iter()
            .filter(|c| c.is_active(Some(&context)))
            .filter_map(|c| c.property_source_arc().cloned())
            .collect();

        logger.info(&format!(
            "Resolved {} property source(s); accepted profiles {:?}",
            property_sources.len(),
            profiles.accepted()
        ));

        Ok(ResolvedEnvironment {
            property_sources,
            profiles,
            tree,
            context,
        })
    }
}

fn compute_profiles(
    tree: &ContributorTree,
    context: &ActivationContext,
    explicit: &ExplicitProfiles,
) -> Result<ProfileSet> {
    let binder = tree.binder(Some(context), BinderOptions::fail_on_inactive());
    let mut additional = explicit.additional.clone();
    additional.extend(bind_profiles(&binder, keys::PROFILES_INCLUDE)?.unwrap_or_default());
    ProfileSet::compute(&explicit.active, &explicit.default, &binder, &additional)
}

fn check_invalid_properties(tree: &ContributorTree) -> Result<()> {
    for contributor in tree {
        if !contributor.is_profile_specific() && contributor.on_profile().is_none() {
            continue;
        }
        let Some(view) = contributor.configuration_source() else {
            continue;
        };
        if let Some(property) = keys::PROFILE_SPECIFIC_FORBIDDEN
            .iter()
            .find(|key| view.contains_any(key))
        {
            return Err(Error::InvalidProperty {
                property: (*property).to_string(),
                contributor: contributor.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Where a resolved property value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// The property asked about.
    pub property: String,
    /// The value with placeholders substituted.
    pub value: String,
    /// The value as written in the source.
    pub raw_value: String,
    /// The name of the supplying property source.
    pub source: String,
    /// The origin recorded on the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// The declared import location, for imported sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// The resource identity, for imported sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// The profile the resource is specific to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// The phase that imported the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<ImportPhase>,
}

/// One effective property of a resolved environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveProperty {
    /// The property name as first written in precedence order.
    pub name: String,
    /// The value with placeholders substituted.
    pub value: String,
    /// The name of the supplying property source.
    pub source: String,
}

/// Serializable summary of a resolution run.
#[derive(Debug, Serialize)]
pub struct EnvironmentSummary<'a> {
    /// The computed profiles.
    pub profiles: &'a ProfileSet,
    /// Active property sources, highest precedence first.
    pub property_sources: Vec<SourceSummary<'a>>,
}

/// One property source in an [`EnvironmentSummary`].
#[derive(Debug, Serialize)]
pub struct SourceSummary<'a> {
    /// Source name.
    pub name: &'a str,
    /// Source origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<&'a str>,
    /// Raw properties.
    pub properties: &'a PropertySource,
}

/// The outcome of a successful resolution run.
#[derive(Debug, Clone)]
pub struct ResolvedEnvironment {
    property_sources: Vec<Arc<PropertySource>>,
    profiles: ProfileSet,
    tree: ContributorTree,
    context: ActivationContext,
}

impl ResolvedEnvironment {
    /// Active property sources, highest precedence first.
    #[must_use]
    pub fn property_sources(&self) -> &[Arc<PropertySource>] {
        &self.property_sources
    }

    /// The computed profiles.
    #[must_use]
    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// The final contributor tree.
    #[must_use]
    pub fn tree(&self) -> &ContributorTree {
        &self.tree
    }

    /// The final activation context.
    #[must_use]
    pub fn activation_context(&self) -> &ActivationContext {
        &self.context
    }

    /// Look up a property across the active sources.
    ///
    /// # Errors
    ///
    /// Returns placeholder failures.
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        self.tree
            .binder(Some(&self.context), BinderOptions::default())
            .get(name)
    }

    /// Look up a list property across the active sources.
    ///
    /// # Errors
    ///
    /// Returns binding and placeholder failures.
    pub fn get_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        self.tree
            .binder(Some(&self.context), BinderOptions::default())
            .get_list(name)
    }

    /// Explain where the value of `name` comes from.
    ///
    /// # Errors
    ///
    /// Returns placeholder failures.
    pub fn explain(&self, name: &str) -> Result<Option<Provenance>> {
        let binder = self.tree.binder(Some(&self.context), BinderOptions::default());
        let Some(contributor) = binder.provider(name) else {
            return Ok(None);
        };
        let view = contributor.configuration_source();
        if let Some(raw_value) = view.and_then(|view| view.get(name)) {
            let raw_value = raw_value.to_string();
            let value = binder.get(name)?.unwrap_or_else(|| raw_value.clone());
            return Ok(Some(provenance(name, contributor, value, raw_value)));
        }

        // Only `name[i]` entries exist; report them comma-joined.
        let raw_value = view
            .map(|view| {
                (0..view.indexed_count(name))
                    .filter_map(|index| view.get_indexed(name, index))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();
        let value = binder
            .get_list(name)?
            .map_or_else(|| raw_value.clone(), |items| items.join(","));
        Ok(Some(provenance(name, contributor, value, raw_value)))
    }

    /// Every effective property, sorted by name.
    ///
    /// Names that differ only in spelling (`on-profile`, `onProfile`) count
    /// once.
    ///
    /// # Errors
    ///
    /// Returns placeholder failures.
    pub fn effective_properties(&self) -> Result<Vec<EffectiveProperty>> {
        let binder = self.tree.binder(Some(&self.context), BinderOptions::default());
        let mut seen = HashSet::new();
        let mut properties = BTreeMap::new();
        for source in &self.property_sources {
            for (name, _) in source.iter() {
                if !seen.insert(canonical_name(name)) {
                    continue;
                }
                let value = binder.get(name)?.unwrap_or_default();
                properties.insert(
                    name.to_string(),
                    EffectiveProperty {
                        name: name.to_string(),
                        value,
                        source: source.name().to_string(),
                    },
                );
            }
        }
        Ok(properties.into_values().collect())
    }

    /// A serializable summary of the run.
    #[must_use]
    pub fn summary(&self) -> EnvironmentSummary<'_> {
        EnvironmentSummary {
            profiles: &self.profiles,
            property_sources: self
                .property_sources
                .iter()
                .map(|source| SourceSummary {
                    name: source.name(),
                    origin: source.origin(),
                    properties: source,
                })
                .collect(),
        }
    }

    /// The final tree rendered for diagnostics.
    #[must_use]
    pub fn render_tree(&self) -> String {
        self.tree.render(Some(&self.context))
    }
}

fn provenance(
    name: &str,
    contributor: &Contributor,
    value: String,
    raw_value: String,
) -> Provenance {
    let resolved = contributor.resolved_location();
    Provenance {
        property: name.to_string(),
        value,
        raw_value,
        source: contributor.name().to_string(),
        origin: contributor
            .property_source()
            .and_then(PropertySource::origin)
            .map(str::to_string),
        location: resolved.map(|r| r.location().to_string()),
        resource: resolved.map(|r| r.resource().to_string()),
        profile: resolved.and_then(|r| r.profile()).map(str::to_string),
        phase: contributor.import_phase(),
    }
}
