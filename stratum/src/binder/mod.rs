//! Typed lookup across the contributors of a tree.
//!
//! A [`CompositeBinder`] answers "what is the value of property `x`" by
//! walking contributors in precedence order and returning the first hit,
//! with placeholders substituted. Two options shape the walk:
//!
//! - active-only filtering skips contributors that are inactive under the
//!   activation context;
//! - fail-on-inactive turns a successful lookup into
//!   [`Error::InactiveSource`] when some inactive contributor also declares
//!   the property.

mod placeholder;

use std::sync::Arc;

use crate::activation::ActivationContext;
use crate::contributor::{Contributor, ContributorTree};
use crate::error::{Error, Result};

use placeholder::PlaceholderResolver;

/// Options controlling which contributors a binder consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinderOptions {
    /// Skip inactive contributors.
    pub active_only: bool,
    /// Fail when an inactive contributor declares a bound property.
    ///
    /// Inactive contributors are not skipped in this mode; they are checked.
    pub fail_on_inactive_source: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            active_only: true,
            fail_on_inactive_source: false,
        }
    }
}

impl BinderOptions {
    /// Consult every contributor that carries a source.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            active_only: false,
            fail_on_inactive_source: false,
        }
    }

    /// Reject properties that inactive contributors also declare.
    #[must_use]
    pub fn fail_on_inactive() -> Self {
        Self {
            active_only: true,
            fail_on_inactive_source: true,
        }
    }

    fn filters_inactive(self) -> bool {
        self.active_only && !self.fail_on_inactive_source
    }
}

#[derive(Clone, Copy)]
enum Scope {
    Property,
    Placeholder,
}

/// Binds properties across the contributors of a [`ContributorTree`].
///
/// # Examples
///
/// ```
/// use stratum::binder::BinderOptions;
/// use stratum::contributor::ContributorTree;
/// use stratum::PropertySource;
///
/// let tree = ContributorTree::from_property_sources(vec![
///     PropertySource::new("high").with_property("greeting", "hello ${name}"),
///     PropertySource::new("low").with_property("name", "world"),
/// ])
/// .unwrap();
///
/// let binder = tree.binder(None, BinderOptions::default());
/// assert_eq!(binder.get("greeting").unwrap().as_deref(), Some("hello world"));
/// ```
pub struct CompositeBinder<'a> {
    tree: &'a ContributorTree,
    context: Option<&'a ActivationContext>,
    options: BinderOptions,
    focus: Option<&'a Arc<Contributor>>,
}

impl<'a> CompositeBinder<'a> {
    /// A binder over every contributor of `tree`.
    #[must_use]
    pub fn new(
        tree: &'a ContributorTree,
        context: Option<&'a ActivationContext>,
        options: BinderOptions,
    ) -> Self {
        Self {
            tree,
            context,
            options,
            focus: None,
        }
    }

    /// A binder that reads properties from `contributor` alone.
    ///
    /// Placeholders in its values still resolve against the contributor
    /// first and then against the active contributors of `tree`. Inactive
    /// sources are never rejected.
    #[must_use]
    pub fn for_contributor(
        tree: &'a ContributorTree,
        contributor: &'a Arc<Contributor>,
        context: Option<&'a ActivationContext>,
    ) -> Self {
        Self {
            tree,
            context,
            options: BinderOptions::default(),
            focus: Some(contributor),
        }
    }

    /// Bind a single string property.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InactiveSource`] in fail-on-inactive mode and
    /// [`Error::PlaceholderCycle`] for cyclic placeholders.
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        let Some(raw) = self.lookup(name, Scope::Property)? else {
            return Ok(None);
        };
        self.check_inactive(name)?;
        self.resolve(name, &raw).map(Some)
    }

    /// Bind a list property.
    ///
    /// A scalar value is split on commas and trimmed; an empty scalar binds
    /// an empty list. Otherwise elements `name[0]`, `name[1]`, ... are taken
    /// from the first contributor that declares any of them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] when list indices are not contiguous, plus
    /// every error [`CompositeBinder::get`] can return.
    pub fn get_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        for contributor in self.candidates(Scope::Property) {
            let Some(view) = contributor.configuration_source() else {
                continue;
            };

            if let Some(raw) = view.get(name) {
                self.check_inactive(name)?;
                let value = self.resolve(name, raw)?;
                if value.trim().is_empty() {
                    return Ok(Some(Vec::new()));
                }
                return Ok(Some(value.split(',').map(|s| s.trim().to_string()).collect()));
            }

            if view.has_indexed(name) {
                self.check_inactive(name)?;
                let count = view.indexed_count(name);
                let mut items = Vec::with_capacity(count);
                for index in 0..count {
                    let element = format!("{name}[{index}]");
                    let raw = view.get_indexed(name, index).ok_or_else(|| Error::Binding {
                        name: name.to_string(),
                        message: format!(
                            "list elements in '{}' are not contiguous: '{element}' is missing",
                            contributor.name()
                        ),
                    })?;
                    items.push(self.resolve(&element, raw)?);
                }
                return Ok(Some(items));
            }
        }
        Ok(None)
    }

    /// The contributor that supplies `name`, if any.
    ///
    /// Uses the same walk as [`CompositeBinder::get`] but neither checks
    /// inactive sources nor substitutes placeholders.
    #[must_use]
    pub fn provider(&self, name: &str) -> Option<&'a Arc<Contributor>> {
        self.candidates(Scope::Property).into_iter().find(|c| {
            c.configuration_source()
                .is_some_and(|view| view.contains_any(name))
        })
    }

    fn candidates(&self, scope: Scope) -> Vec<&'a Arc<Contributor>> {
        let context = self.context;
        match (self.focus, scope) {
            (Some(focus), Scope::Property) => vec![focus],
            (Some(focus), Scope::Placeholder) => std::iter::once(focus)
                .chain(self.tree.iter().filter(|c| {
                    !Arc::ptr_eq(c, focus)
                        && c.configuration_source().is_some()
                        && c.is_active(context)
                }))
                .collect(),
            (None, _) => {
                let filter = self.options.filters_inactive();
                self.tree
                    .iter()
                    .filter(|c| c.configuration_source().is_some())
                    .filter(|c| !filter || c.is_active(context))
                    .collect()
            }
        }
    }

    fn lookup(&self, name: &str, scope: Scope) -> Result<Option<String>> {
        let found = self
            .candidates(scope)
            .into_iter()
            .find_map(|c| c.configuration_source().and_then(|view| view.get(name)))
            .map(str::to_string);
        if found.is_some() && matches!(scope, Scope::Placeholder) {
            self.check_inactive(name)?;
        }
        Ok(found)
    }

    fn resolve(&self, name: &str, raw: &str) -> Result<String> {
        if !raw.contains("${") {
            return Ok(raw.to_string());
        }
        let lookup = |key: &str| self.lookup(key, Scope::Placeholder);
        PlaceholderResolver::new(&lookup).resolve_property(name, raw)
    }

    fn check_inactive(&self, name: &str) -> Result<()> {
        if self.focus.is_some() || !self.options.fail_on_inactive_source {
            return Ok(());
        }
        let offender = self.tree.iter().find(|c| {
            !c.is_active(self.context)
                && c.configuration_source()
                    .is_some_and(|view| view.contains_any(name))
        });
        match offender {
            Some(contributor) => Err(Error::InactiveSource {
                property: name.to_string(),
                contributor: contributor.name().to_string(),
            }),
            None => Ok(()),
        }
    }
}
