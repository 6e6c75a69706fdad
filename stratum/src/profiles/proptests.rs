//! Property-based tests for profile sets and expressions.

use super::{ProfileExpression, ProfileSet};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,6}"
}

fn expression() -> impl Strategy<Value = ProfileExpression> {
    let leaf = name().prop_map(ProfileExpression::Profile);
    leaf.prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            inner
                .clone()
                .prop_map(|e| ProfileExpression::Not(Box::new(e))),
            prop::collection::vec(inner.clone(), 2..4).prop_map(ProfileExpression::All),
            prop::collection::vec(inner, 2..4).prop_map(ProfileExpression::Any),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Rendering an expression and parsing it back gives the same expression
    #[test]
    fn expression_display_parses_back(expr in expression()) {
        let parsed = ProfileExpression::parse(&expr.to_string()).unwrap();
        prop_assert_eq!(parsed, expr);
    }

    // Negation always flips the outcome
    #[test]
    fn negation_flips(expr in expression(), accepted in prop::collection::vec(name(), 0..4)) {
        let is_accepted = |p: &str| accepted.iter().any(|a| a == p);
        let negated = ProfileExpression::Not(Box::new(expr.clone()));
        prop_assert_ne!(expr.matches_with(&is_accepted), negated.matches_with(&is_accepted));
    }

    // Accepted profiles are the unique active ones, or the defaults when none are active
    #[test]
    fn accepted_falls_back_to_default(
        active in prop::collection::vec(name(), 0..5),
        default in prop::collection::vec(name(), 0..5)
    ) {
        let profiles = ProfileSet::new(active.clone(), default.clone());
        let expected_source = if active.is_empty() { &default } else { &active };

        for profile in expected_source {
            prop_assert!(profiles.is_accepted(profile));
        }
        let mut seen = std::collections::HashSet::new();
        for profile in profiles.accepted() {
            prop_assert!(seen.insert(profile.clone()), "duplicate {}", profile);
        }
        prop_assert_eq!(profiles.accepted().len(), seen.len());
        prop_assert!(profiles.accepted().iter().all(|p| expected_source.contains(p)));
    }

    // Building a set from its own lists is a no-op
    #[test]
    fn profile_set_is_stable(
        active in prop::collection::vec(name(), 0..5),
        default in prop::collection::vec(name(), 0..5)
    ) {
        let once = ProfileSet::new(active, default);
        let twice = ProfileSet::new(once.active().to_vec(), once.defaults().to_vec());
        prop_assert_eq!(once, twice);
    }
}
