//! The resolution driver: drives a contributor tree to exhaustion for one
//! import phase.

use std::sync::Arc;

use crate::activation::{ActivationContext, ImportPhase};
use crate::binder::CompositeBinder;
use crate::contributor::{Contributor, ContributorTree};
use crate::error::Result;
use crate::import::{Importer, ResolverContext};

/// Repeatedly binds unbound imports and expands pending imports until the
/// tree has no work left for the current phase.
///
/// Every step produces a new tree; the input tree is never modified.
pub struct ResolutionDriver<'i> {
    importer: &'i Importer,
}

impl<'i> ResolutionDriver<'i> {
    /// A driver delegating imports to `importer`.
    #[must_use]
    pub fn new(importer: &'i Importer) -> Self {
        Self { importer }
    }

    /// Process `tree` under `context` until no contributor needs work.
    ///
    /// # Errors
    ///
    /// Returns the first binding, placeholder or import failure. Import
    /// failures other than a missing location are wrapped with the
    /// contributor that declared the import.
    pub fn process(
        &self,
        tree: ContributorTree,
        context: Option<&ActivationContext>,
    ) -> Result<ContributorTree> {
        let logger = self.importer.logger();
        let phase = ImportPhase::of(context);
        let mut tree = tree;
        let mut steps = 0usize;

        loop {
            let Some(next) = next_to_process(&tree, context, phase).cloned() else {
                logger.debug(&format!("Completed {phase} after {steps} step(s)"));
                return Ok(tree);
            };
            steps += 1;

            let replacement = match next.as_ref() {
                Contributor::UnboundImport { .. } => {
                    logger.trace(&format!("Binding {}", next.name()));
                    let binder = CompositeBinder::for_contributor(&tree, &next, context);
                    next.with_bound_properties(&binder)?
                }
                _ => {
                    let children = self
                        .import(&tree, &next, context)
                        .map_err(|e| e.in_contributor(next.name()))?;
                    next.with_children(phase, children)
                }
            };
            tree = tree.with_replacement(&next, replacement);
        }
    }

    fn import(
        &self,
        tree: &ContributorTree,
        contributor: &Contributor,
        context: Option<&ActivationContext>,
    ) -> Result<Vec<Arc<Contributor>>> {
        let phase = ImportPhase::of(context);
        let profiles = context.and_then(ActivationContext::profiles).cloned();
        let resolver_context =
            ResolverContext::new(contributor.resolved_location().cloned(), profiles);

        self.importer.logger().trace(&format!(
            "Processing imports {:?} of {} ({phase})",
            contributor
                .imports()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            contributor.name()
        ));

        let loaded = self.importer.resolve_and_load(
            &resolver_context,
            contributor.imports(),
            &tree.loaded_resources(),
        )?;

        let mut children = Vec::new();
        for resource in loaded {
            let profile_specific = resource.bundle.is_profile_specific();
            for source in resource.bundle.into_property_sources().into_iter().rev() {
                children.push(Arc::new(Contributor::unbound_import(
                    resource.resolved.clone(),
                    source,
                    profile_specific,
                    phase,
                )));
            }
        }
        Ok(children)
    }
}

/// The first contributor, in tree order, that needs work in `phase`.
fn next_to_process<'t>(
    tree: &'t ContributorTree,
    context: Option<&ActivationContext>,
    phase: ImportPhase,
) -> Option<&'t Arc<Contributor>> {
    tree.iter().find(|contributor| match contributor.as_ref() {
        Contributor::UnboundImport { .. } => true,
        other => other.is_active(context) && other.has_unprocessed_imports(phase),
    })
}
