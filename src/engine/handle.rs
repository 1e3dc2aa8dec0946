//! View of the machine passed to every hook.

use crate::core::{StateId, StateTree};
use crate::engine::context::MachineContext;
use crate::engine::{Error, Phase};

/// What a hook can see and do while it runs.
///
/// A hook may read and mutate the user context, request a transition
/// (recorded as pending, never applied synchronously) and request
/// termination. It cannot run `tick` or `dispatch` reentrantly.
pub struct Handle<'a, S: StateId, C> {
    pub(crate) tree: &'a StateTree<S>,
    pub(crate) core: &'a mut MachineContext<S, C>,
}

impl<S: StateId, C> Handle<'_, S, C> {
    /// Shared user context.
    pub fn context(&self) -> &C {
        &self.core.user
    }

    /// Mutable user context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.core.user
    }

    /// Request a transition to `target`.
    ///
    /// The transition is applied once the current operation settles. A
    /// later request before that replaces this one.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPhase`] when called from an exit hook
    /// - [`Error::UnknownState`] when `target` is not registered
    pub fn transition(&mut self, target: S) -> Result<(), Error> {
        self.core.request(self.tree, target)
    }

    /// Stop the machine with a termination value.
    ///
    /// Remaining hooks of the current operation are skipped.
    pub fn terminate(&mut self, value: i32) {
        tracing::debug!(value, "termination requested by hook");
        self.core.terminate(Some(value));
    }

    /// Stop the machine without a termination value.
    pub fn stop(&mut self) {
        self.core.terminate(None);
    }

    /// Current leaf state, `None` while only the root is active.
    pub fn current_state(&self) -> Option<S> {
        self.tree.id_of(self.core.active)
    }

    /// Leaf that was active before the last applied transition.
    pub fn previous_state(&self) -> Option<S> {
        self.tree.id_of(self.core.previous)
    }

    /// State whose hook is running; an ancestor of the leaf while bubbling.
    pub fn executing_state(&self) -> Option<S> {
        self.tree.id_of(self.core.executing)
    }

    /// Display name of the state whose hook is running.
    pub fn executing_name(&self) -> Option<&str> {
        self.core.executing.map(|node| self.tree.node(node).name())
    }

    /// Engine phase the hook runs in.
    pub fn phase(&self) -> Phase {
        self.core.phase
    }

    /// Check if a transition is waiting to be applied.
    pub fn has_pending_transition(&self) -> bool {
        self.core.pending.is_some()
    }

    /// Check if termination has been requested.
    pub fn is_terminated(&self) -> bool {
        self.core.terminated
    }
}
