//! Structural validation of declared initial children.
//!
//! Uses Stillwater's `Validation` to accumulate every violation instead of
//! stopping at the first, so a misconfigured tree is reported in one pass.

use crate::builder::error::TreeViolation;
use crate::core::topology::is_descendant;
use crate::core::{NodeId, StateId, StateTree};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<TreeViolation>>;

/// Check the `(owner, initial)` declarations against the tree.
///
/// On success returns the resolved `(owner, initial)` links. An initial child
/// must be registered, must be a strict descendant of its owner, and the
/// chain of initial children starting at any owner must not be longer than
/// `max_drill_depth`.
pub(crate) fn validate_initials<S: StateId>(
    tree: &StateTree<S>,
    declared: &[(NodeId, S)],
    max_drill_depth: usize,
) -> Result<Vec<(NodeId, NodeId)>, Vec<TreeViolation>> {
    let mut checks: Vec<Check> = Vec::with_capacity(declared.len() * 2);
    let mut links: HashMap<NodeId, NodeId> = HashMap::with_capacity(declared.len());

    for &(owner, initial) in declared {
        let state = tree.node(owner).name().to_string();
        let check = match tree.lookup(initial) {
            None => Validation::fail(TreeViolation::UnknownInitial {
                state,
                initial: initial.name().to_string(),
            }),
            Some(child) if child == owner || !is_descendant(tree, child, owner) => {
                Validation::fail(TreeViolation::InitialNotDescendant {
                    state,
                    initial: initial.name().to_string(),
                })
            }
            Some(child) => {
                links.insert(owner, child);
                Validation::success(())
            }
        };
        checks.push(check);
    }

    for &(owner, _) in declared {
        let mut depth = 0;
        let mut node = owner;
        while let Some(&next) = links.get(&node) {
            depth += 1;
            node = next;
            if depth > max_drill_depth {
                break;
            }
        }
        if depth > max_drill_depth {
            checks.push(Validation::fail(TreeViolation::DrillTooDeep {
                state: tree.node(owner).name().to_string(),
                limit: max_drill_depth,
            }));
        }
    }

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(links.into_iter().collect()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Outer,
        Middle,
        Inner,
        Sibling,
        Missing,
    }

    impl StateId for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Outer => "Outer",
                Self::Middle => "Middle",
                Self::Inner => "Inner",
                Self::Sibling => "Sibling",
                Self::Missing => "Missing",
            }
        }
    }

    fn sample() -> (StateTree<TestState>, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = StateTree::new();
        let outer = tree.insert(TestState::Outer, NodeId::ROOT).unwrap();
        let middle = tree.insert(TestState::Middle, outer).unwrap();
        let inner = tree.insert(TestState::Inner, middle).unwrap();
        let sibling = tree.insert(TestState::Sibling, NodeId::ROOT).unwrap();
        (tree, outer, middle, inner, sibling)
    }

    #[test]
    fn valid_declarations_resolve_to_links() {
        let (tree, outer, middle, inner, _) = sample();
        let declared = [(outer, TestState::Middle), (middle, TestState::Inner)];

        let mut links = validate_initials(&tree, &declared, 64).unwrap();
        links.sort();

        assert_eq!(links, vec![(outer, middle), (middle, inner)]);
    }

    #[test]
    fn initial_may_skip_levels() {
        let (tree, outer, _, inner, _) = sample();
        let links = validate_initials(&tree, &[(outer, TestState::Inner)], 64).unwrap();
        assert_eq!(links, vec![(outer, inner)]);
    }

    #[test]
    fn all_violations_are_accumulated() {
        let (tree, outer, middle, _, sibling) = sample();
        let declared = [
            (outer, TestState::Missing),
            (middle, TestState::Sibling),
            (sibling, TestState::Sibling),
        ];

        let violations = validate_initials(&tree, &declared, 64).unwrap_err();

        assert_eq!(violations.len(), 3);
        assert!(violations
            .iter()
            .any(|v| matches!(v, TreeViolation::UnknownInitial { .. })));
        assert_eq!(
            violations
                .iter()
                .filter(|v| matches!(v, TreeViolation::InitialNotDescendant { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn drill_depth_is_bounded() {
        let (tree, outer, middle, _, _) = sample();
        let declared = [(outer, TestState::Middle), (middle, TestState::Inner)];

        let violations = validate_initials(&tree, &declared, 1).unwrap_err();

        assert_eq!(
            violations,
            vec![TreeViolation::DrillTooDeep {
                state: "Outer".to_string(),
                limit: 1,
            }]
        );
    }
}
