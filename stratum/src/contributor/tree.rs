//! The immutable contributor tree and its traversal order.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::activation::{ActivationContext, ImportPhase};
use crate::binder::{BinderOptions, CompositeBinder};
use crate::contributor::{Contributor, ContributorKind};
use crate::error::Result;
use crate::source::PropertySource;

/// An immutable tree of contributors rooted at a single
/// [`Contributor::Root`].
///
/// Replacing a node yields a new tree that shares every untouched subtree
/// with the old one.
///
/// Iteration is depth-first with children before their parent: for each
/// node, the children imported after profile activation come first, then
/// the children imported before it, then the node itself. Within a phase the
/// most recently attached child comes first. Iteration order is precedence
/// order; earlier contributors win.
#[derive(Debug, Clone)]
pub struct ContributorTree {
    root: Arc<Contributor>,
}

impl ContributorTree {
    /// A tree over initial contributors given in precedence order.
    #[must_use]
    pub fn new(contributors: Vec<Contributor>) -> Self {
        Self {
            root: Arc::new(Contributor::root(contributors)),
        }
    }

    /// Wrap caller-supplied property sources, given in precedence order,
    /// and bind the `config.import` each of them declares.
    ///
    /// # Errors
    ///
    /// Returns any failure binding the declared imports.
    pub fn from_property_sources(sources: Vec<PropertySource>) -> Result<Self> {
        let mut tree = Self::new(sources.into_iter().map(Contributor::existing).collect());
        let existing: Vec<Arc<Contributor>> = tree
            .iter()
            .filter(|c| c.kind() == ContributorKind::Existing)
            .cloned()
            .collect();
        for contributor in existing {
            let bound = {
                let binder = CompositeBinder::for_contributor(&tree, &contributor, None);
                contributor.with_bound_properties(&binder)?
            };
            tree = tree.with_replacement(&contributor, bound);
        }
        Ok(tree)
    }

    /// The root contributor.
    #[must_use]
    pub fn root(&self) -> &Arc<Contributor> {
        &self.root
    }

    /// Iterate over all contributors in precedence order, root last.
    #[must_use]
    pub fn iter(&self) -> ContributorIter<'_> {
        ContributorIter {
            stack: vec![Step::Expand(&self.root)],
        }
    }

    /// Number of contributors, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the tree holds nothing but the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    /// A new tree with `target` replaced by `replacement`.
    ///
    /// `target` is matched by identity. When it is not part of the tree the
    /// returned tree is unchanged.
    #[must_use]
    pub fn with_replacement(&self, target: &Arc<Contributor>, replacement: Contributor) -> Self {
        let replacement = Arc::new(replacement);
        match replace_in(&self.root, target, &replacement) {
            Some(root) => Self { root },
            None => self.clone(),
        }
    }

    /// A binder over this tree.
    #[must_use]
    pub fn binder<'a>(
        &'a self,
        context: Option<&'a ActivationContext>,
        options: BinderOptions,
    ) -> CompositeBinder<'a> {
        CompositeBinder::new(self, context, options)
    }

    /// Resource identities of every imported contributor.
    #[must_use]
    pub fn loaded_resources(&self) -> HashSet<&str> {
        self.iter()
            .filter_map(|c| c.resolved_location())
            .map(|r| r.resource())
            .collect()
    }

    /// Render the tree for diagnostics, one contributor per line.
    ///
    /// Children are listed under their parent, grouped by phase, in
    /// precedence order.
    #[must_use]
    pub fn render(&self, context: Option<&ActivationContext>) -> String {
        let mut out = String::new();
        render_node(&mut out, &self.root, context, 0);
        out
    }
}

impl<'a> IntoIterator for &'a ContributorTree {
    type Item = &'a Arc<Contributor>;
    type IntoIter = ContributorIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

enum Step<'a> {
    Expand(&'a Arc<Contributor>),
    Emit(&'a Arc<Contributor>),
}

/// Lazy iterator over a [`ContributorTree`].
pub struct ContributorIter<'a> {
    stack: Vec<Step<'a>>,
}

impl<'a> Iterator for ContributorIter<'a> {
    type Item = &'a Arc<Contributor>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Emit(node) => return Some(node),
                Step::Expand(node) => {
                    self.stack.push(Step::Emit(node));
                    // Pushed in reverse of visiting order: before-phase children
                    // first so the after-phase children pop first, and each list
                    // front to back so its last child pops first.
                    for phase in ImportPhase::TRAVERSAL_ORDER.iter().rev() {
                        if let Some(children) = node.children(*phase) {
                            self.stack.extend(children.iter().map(Step::Expand));
                        }
                    }
                }
            }
        }
        None
    }
}

fn replace_in(
    node: &Arc<Contributor>,
    target: &Arc<Contributor>,
    replacement: &Arc<Contributor>,
) -> Option<Arc<Contributor>> {
    if Arc::ptr_eq(node, target) {
        return Some(Arc::clone(replacement));
    }
    for phase in ImportPhase::TRAVERSAL_ORDER {
        let Some(children) = node.children(phase) else {
            continue;
        };
        for (index, child) in children.iter().enumerate() {
            if let Some(updated) = replace_in(child, target, replacement) {
                let mut rebuilt = children.to_vec();
                rebuilt[index] = updated;
                return Some(Arc::new(node.with_children(phase, rebuilt)));
            }
        }
    }
    None
}

fn render_node(
    out: &mut String,
    node: &Contributor,
    context: Option<&ActivationContext>,
    depth: usize,
) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}{}", node.kind());
    if node.kind() != ContributorKind::Root {
        let _ = write!(out, " '{}'", node.name());
        if let Some(profile) = node.resolved_location().and_then(|r| r.profile()) {
            let _ = write!(out, " profile={profile}");
        }
        if let Some(expression) = node.on_profile() {
            let _ = write!(out, " on-profile={expression}");
        }
        if !node.is_active(context) {
            out.push_str(" (inactive)");
        }
    }
    out.push('\n');

    for phase in ImportPhase::TRAVERSAL_ORDER {
        let Some(children) = node.children(phase) else {
            continue;
        };
        if node.kind() != ContributorKind::Root {
            let _ = writeln!(out, "{indent}  @{phase}");
        }
        let depth = if node.kind() == ContributorKind::Root {
            depth + 1
        } else {
            depth + 2
        };
        for child in children.iter().rev() {
            render_node(out, child, context, depth);
        }
    }
}
