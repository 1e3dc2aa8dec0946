//! Event bubbling.

use crate::core::{NodeId, Outcome, StateId, Topology};
use crate::engine::transition::Engine;
use crate::engine::{Handle, Phase};

impl<S: StateId, C, E: ?Sized> Engine<'_, S, C, E> {
    /// Offer `event` to the active leaf, then to each ancestor up to the
    /// root, until one handles it.
    ///
    /// A state without a run hook propagates. Bubbling also stops as soon
    /// as a hook requests a transition or termination.
    pub(crate) fn bubble(&mut self, event: &E) -> Outcome {
        let registry = self.registry;
        let tree = &registry.tree;
        self.core.phase = Phase::Run;

        let mut outcome = Outcome::Propagate;
        let mut cursor = Some(self.core.active.unwrap_or(NodeId::ROOT));
        while let Some(node) = cursor {
            self.core.executing = Some(node);
            if let Some(run) = &registry.hooks(node).run {
                tracing::trace!(state = tree.node(node).name(), "run");
                outcome = run(
                    &mut Handle {
                        tree,
                        core: &mut *self.core,
                    },
                    event,
                );
            }
            if outcome.is_handled() || self.core.terminated || self.core.pending.is_some() {
                break;
            }
            cursor = tree.parent(node);
        }

        self.core.phase = Phase::Idle;
        self.core.executing = None;
        outcome
    }
}
