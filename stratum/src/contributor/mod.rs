//! Contributors: the nodes of the resolution tree.
//!
//! A [`Contributor`] wraps either an initial property source or one
//! property source of an imported bundle. Contributors are immutable: every
//! lifecycle transition builds a new value that replaces the old one in a
//! new [`ContributorTree`].
//!
//! ```text
//! Existing ──────────────────────────────> Existing (with children)
//! UnboundImport ──bind──> BoundImport ──imports read──> Imported
//! ```

mod tree;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::activation::{ActivationContext, ImportPhase};
use crate::binder::CompositeBinder;
use crate::error::Result;
use crate::keys;
use crate::location::{ImportLocation, ResolvedLocation};
use crate::profiles::ProfileExpression;
use crate::source::{ConfigurationPropertySource, PropertySource};

pub use tree::{ContributorIter, ContributorTree};

/// The lifecycle state of a contributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributorKind {
    /// The single tree root.
    Root,
    /// A property source supplied by the caller.
    Existing,
    /// An imported source whose own properties are not bound yet.
    UnboundImport,
    /// An imported source with bound properties.
    BoundImport,
    /// An imported source whose own imports have been read.
    Imported,
}

impl fmt::Display for ContributorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "ROOT",
            Self::Existing => "EXISTING",
            Self::UnboundImport => "UNBOUND_IMPORT",
            Self::BoundImport => "BOUND_IMPORT",
            Self::Imported => "IMPORTED",
        };
        write!(f, "{name}")
    }
}

/// A property source together with its queryable projection.
#[derive(Debug, Clone)]
pub struct SourceHandle {
    source: Arc<PropertySource>,
    view: Arc<ConfigurationPropertySource>,
}

impl SourceHandle {
    fn new(source: PropertySource) -> Self {
        let view = ConfigurationPropertySource::from_source(&source);
        Self {
            source: Arc::new(source),
            view: Arc::new(view),
        }
    }
}

/// Where an imported contributor came from.
#[derive(Debug, Clone)]
pub struct ImportOrigin {
    resolved: ResolvedLocation,
    source: SourceHandle,
    profile_specific: bool,
    phase: ImportPhase,
}

impl ImportOrigin {
    /// The resolved resource.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedLocation {
        &self.resolved
    }

    /// Whether the source came from a profile-specific bundle.
    #[must_use]
    pub fn is_profile_specific(&self) -> bool {
        self.profile_specific
    }

    /// The phase in which the source was imported.
    #[must_use]
    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    fn is_active(&self, context: Option<&ActivationContext>) -> bool {
        if !self.profile_specific && self.resolved.profile().is_none() {
            return true;
        }
        let Some(profiles) = context.and_then(ActivationContext::profiles) else {
            return false;
        };
        self.resolved
            .profile()
            .map_or(true, |profile| profiles.is_accepted(profile))
    }
}

/// Properties an imported source declares about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredProperties {
    imports: Vec<ImportLocation>,
    on_profile: Option<ProfileExpression>,
}

impl DeclaredProperties {
    /// Bind `config.import` and `config.activate.on-profile`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`](crate::Error::Binding) for empty import
    /// entries or a malformed profile expression, and any placeholder error.
    pub fn bind(binder: &CompositeBinder<'_>) -> Result<Self> {
        let on_profile = match binder.get(keys::ACTIVATE_ON_PROFILE)? {
            Some(text) if !text.trim().is_empty() => Some(ProfileExpression::parse(&text)?),
            _ => None,
        };
        Ok(Self {
            imports: bind_imports(binder)?,
            on_profile,
        })
    }

    /// The declared import locations.
    #[must_use]
    pub fn imports(&self) -> &[ImportLocation] {
        &self.imports
    }

    /// The declared profile expression.
    #[must_use]
    pub fn on_profile(&self) -> Option<&ProfileExpression> {
        self.on_profile.as_ref()
    }

    fn is_active(&self, context: Option<&ActivationContext>) -> bool {
        match &self.on_profile {
            None => true,
            Some(expression) => context
                .and_then(ActivationContext::profiles)
                .is_some_and(|profiles| expression.matches(profiles)),
        }
    }
}

fn bind_imports(binder: &CompositeBinder<'_>) -> Result<Vec<ImportLocation>> {
    binder
        .get_list(keys::IMPORT)?
        .unwrap_or_default()
        .iter()
        .map(|declared| ImportLocation::parse(declared))
        .collect()
}

/// Child contributors grouped by the phase that imported them.
///
/// A phase entry is `None` until that phase has processed the owner's
/// imports, and `Some` (possibly empty) afterwards.
#[derive(Debug, Clone, Default)]
pub struct Children {
    before: Option<Vec<Arc<Contributor>>>,
    after: Option<Vec<Arc<Contributor>>>,
}

impl Children {
    /// The children attached in `phase`, in insertion order.
    #[must_use]
    pub fn get(&self, phase: ImportPhase) -> Option<&[Arc<Contributor>]> {
        match phase {
            ImportPhase::BeforeProfileActivation => self.before.as_deref(),
            ImportPhase::AfterProfileActivation => self.after.as_deref(),
        }
    }

    fn with(&self, phase: ImportPhase, children: Vec<Arc<Contributor>>) -> Self {
        let mut next = self.clone();
        match phase {
            ImportPhase::BeforeProfileActivation => next.before = Some(children),
            ImportPhase::AfterProfileActivation => next.after = Some(children),
        }
        next
    }
}

/// One node of the resolution tree.
#[derive(Debug, Clone)]
pub enum Contributor {
    /// The tree root; its children are the initial contributors.
    Root {
        /// Child contributors.
        children: Children,
    },
    /// A caller-supplied property source.
    Existing {
        /// The wrapped source.
        source: SourceHandle,
        /// Imports declared by the source.
        imports: Vec<ImportLocation>,
        /// Imported children.
        children: Children,
    },
    /// An imported source awaiting property binding.
    UnboundImport {
        /// Where the source came from.
        origin: ImportOrigin,
    },
    /// An imported source with bound properties and no processed imports.
    BoundImport {
        /// Where the source came from.
        origin: ImportOrigin,
        /// The bound declarations.
        properties: DeclaredProperties,
    },
    /// An imported source whose own imports have been processed.
    Imported {
        /// Where the source came from.
        origin: ImportOrigin,
        /// The bound declarations.
        properties: DeclaredProperties,
        /// Imported children.
        children: Children,
    },
}

impl Contributor {
    /// A root over initial contributors given in precedence order.
    #[must_use]
    pub fn root(contributors: Vec<Contributor>) -> Self {
        let children = contributors.into_iter().rev().map(Arc::new).collect();
        Self::Root {
            children: Children::default().with(ImportPhase::BeforeProfileActivation, children),
        }
    }

    /// Wrap a caller-supplied property source.
    ///
    /// Its imports are bound separately, see
    /// [`ContributorTree::from_property_sources`].
    #[must_use]
    pub fn existing(source: PropertySource) -> Self {
        Self::Existing {
            source: SourceHandle::new(source),
            imports: Vec::new(),
            children: Children::default(),
        }
    }

    /// Wrap one source of an imported bundle.
    #[must_use]
    pub fn unbound_import(
        resolved: ResolvedLocation,
        source: PropertySource,
        profile_specific: bool,
        phase: ImportPhase,
    ) -> Self {
        Self::UnboundImport {
            origin: ImportOrigin {
                resolved,
                source: SourceHandle::new(source),
                profile_specific,
                phase,
            },
        }
    }

    /// The lifecycle state.
    #[must_use]
    pub fn kind(&self) -> ContributorKind {
        match self {
            Self::Root { .. } => ContributorKind::Root,
            Self::Existing { .. } => ContributorKind::Existing,
            Self::UnboundImport { .. } => ContributorKind::UnboundImport,
            Self::BoundImport { .. } => ContributorKind::BoundImport,
            Self::Imported { .. } => ContributorKind::Imported,
        }
    }

    fn source_handle(&self) -> Option<&SourceHandle> {
        match self {
            Self::Root { .. } => None,
            Self::Existing { source, .. } => Some(source),
            Self::UnboundImport { origin }
            | Self::BoundImport { origin, .. }
            | Self::Imported { origin, .. } => Some(&origin.source),
        }
    }

    fn origin(&self) -> Option<&ImportOrigin> {
        match self {
            Self::Root { .. } | Self::Existing { .. } => None,
            Self::UnboundImport { origin }
            | Self::BoundImport { origin, .. }
            | Self::Imported { origin, .. } => Some(origin),
        }
    }

    fn children_ref(&self) -> Option<&Children> {
        match self {
            Self::Root { children }
            | Self::Existing { children, .. }
            | Self::Imported { children, .. } => Some(children),
            Self::UnboundImport { .. } | Self::BoundImport { .. } => None,
        }
    }

    /// The wrapped property source.
    #[must_use]
    pub fn property_source(&self) -> Option<&PropertySource> {
        self.source_handle().map(|h| h.source.as_ref())
    }

    /// The shared handle to the wrapped property source.
    #[must_use]
    pub fn property_source_arc(&self) -> Option<&Arc<PropertySource>> {
        self.source_handle().map(|h| &h.source)
    }

    /// The queryable projection of the wrapped source.
    #[must_use]
    pub fn configuration_source(&self) -> Option<&ConfigurationPropertySource> {
        self.source_handle().map(|h| h.view.as_ref())
    }

    /// The resource this contributor was imported from.
    #[must_use]
    pub fn resolved_location(&self) -> Option<&ResolvedLocation> {
        self.origin().map(ImportOrigin::resolved)
    }

    /// The declared location this contributor was imported from.
    #[must_use]
    pub fn import_location(&self) -> Option<&ImportLocation> {
        self.resolved_location().map(ResolvedLocation::location)
    }

    /// The phase in which this contributor was imported.
    #[must_use]
    pub fn import_phase(&self) -> Option<ImportPhase> {
        self.origin().map(ImportOrigin::phase)
    }

    /// Whether the contributor came from a profile-specific bundle.
    #[must_use]
    pub fn is_profile_specific(&self) -> bool {
        self.origin().is_some_and(ImportOrigin::is_profile_specific)
    }

    /// The imports this contributor declares; empty until bound.
    #[must_use]
    pub fn imports(&self) -> &[ImportLocation] {
        match self {
            Self::Existing { imports, .. } => imports,
            Self::BoundImport { properties, .. } | Self::Imported { properties, .. } => {
                properties.imports()
            }
            Self::Root { .. } | Self::UnboundImport { .. } => &[],
        }
    }

    /// The profile expression gating this contributor.
    #[must_use]
    pub fn on_profile(&self) -> Option<&ProfileExpression> {
        match self {
            Self::BoundImport { properties, .. } | Self::Imported { properties, .. } => {
                properties.on_profile()
            }
            _ => None,
        }
    }

    /// The children attached in `phase`, if that phase processed this node.
    #[must_use]
    pub fn children(&self, phase: ImportPhase) -> Option<&[Arc<Contributor>]> {
        self.children_ref().and_then(|c| c.get(phase))
    }

    /// A display name for diagnostics and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        self.property_source().map_or("root", PropertySource::name)
    }

    /// Whether this contributor participates under `context`.
    ///
    /// The root and existing contributors are always active, unbound imports
    /// never are. Bound imports are active when their profile tag and their
    /// `config.activate.on-profile` expression are both satisfied; either
    /// condition requires known profiles.
    #[must_use]
    pub fn is_active(&self, context: Option<&ActivationContext>) -> bool {
        match self {
            Self::Root { .. } | Self::Existing { .. } => true,
            Self::UnboundImport { .. } => false,
            Self::BoundImport { origin, properties } | Self::Imported { origin, properties, .. } => {
                origin.is_active(context) && properties.is_active(context)
            }
        }
    }

    /// Whether imports are declared but not yet processed for `phase`.
    #[must_use]
    pub fn has_unprocessed_imports(&self, phase: ImportPhase) -> bool {
        !self.imports().is_empty() && self.children(phase).is_none()
    }

    /// Bind the contributor's declared properties.
    ///
    /// Unbound imports become [`Contributor::BoundImport`]; existing sources
    /// get their `config.import` list. Other contributors are returned as is.
    ///
    /// # Errors
    ///
    /// Returns any binding or placeholder failure.
    pub fn with_bound_properties(&self, binder: &CompositeBinder<'_>) -> Result<Self> {
        Ok(match self {
            Self::UnboundImport { origin } => Self::BoundImport {
                origin: origin.clone(),
                properties: DeclaredProperties::bind(binder)?,
            },
            Self::Existing {
                source, children, ..
            } => Self::Existing {
                source: source.clone(),
                imports: bind_imports(binder)?,
                children: children.clone(),
            },
            other => other.clone(),
        })
    }

    /// Attach `children` for `phase`.
    ///
    /// Bound imports become [`Contributor::Imported`]. Unbound imports never
    /// take children and are returned unchanged.
    #[must_use]
    pub fn with_children(&self, phase: ImportPhase, children: Vec<Arc<Contributor>>) -> Self {
        match self {
            Self::Root { children: current } => Self::Root {
                children: current.with(phase, children),
            },
            Self::Existing {
                source,
                imports,
                children: current,
            } => Self::Existing {
                source: source.clone(),
                imports: imports.clone(),
                children: current.with(phase, children),
            },
            Self::BoundImport { origin, properties } => Self::Imported {
                origin: origin.clone(),
                properties: properties.clone(),
                children: Children::default().with(phase, children),
            },
            Self::Imported {
                origin,
                properties,
                children: current,
            } => Self::Imported {
                origin: origin.clone(),
                properties: properties.clone(),
                children: current.with(phase, children),
            },
            Self::UnboundImport { .. } => self.clone(),
        }
    }
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name())
    }
}
