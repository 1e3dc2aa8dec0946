//! Mutable bookkeeping of one machine instance.

use crate::core::{NodeId, StateId, StateTree, TransitionHistory};
use crate::engine::Error;
use serde::{Deserialize, Serialize};

/// Internal phase of the engine.
///
/// `Idle -> Run -> Idle` while dispatching, `Idle -> Exit -> Entry -> Idle`
/// while applying a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Run,
    Entry,
    Exit,
}

/// Machine context shared with every hook.
///
/// Mutated only by the transition engine and the dispatch loop, plus the
/// narrow request API exposed to hooks through [`Handle`](crate::Handle).
pub(crate) struct MachineContext<S: StateId, C> {
    pub(crate) user: C,
    pub(crate) active: Option<NodeId>,
    pub(crate) previous: Option<NodeId>,
    pub(crate) executing: Option<NodeId>,
    pub(crate) pending: Option<NodeId>,
    pub(crate) phase: Phase,
    pub(crate) started: bool,
    pub(crate) terminated: bool,
    pub(crate) terminate_value: Option<i32>,
    pub(crate) history: TransitionHistory<S>,
}

impl<S: StateId, C> MachineContext<S, C> {
    pub(crate) fn new(user: C, history_capacity: usize) -> Self {
        Self {
            user,
            active: None,
            previous: None,
            executing: None,
            pending: None,
            phase: Phase::Idle,
            started: false,
            terminated: false,
            terminate_value: None,
            history: TransitionHistory::with_capacity(history_capacity),
        }
    }

    /// Clear everything but the user context, ready for a fresh start.
    pub(crate) fn reset(&mut self) {
        self.active = None;
        self.previous = None;
        self.executing = None;
        self.pending = None;
        self.phase = Phase::Idle;
        self.started = false;
        self.terminated = false;
        self.terminate_value = None;
        self.history.clear();
    }

    /// Record `target` as the pending transition.
    ///
    /// Last write wins: a second request before the first is applied
    /// replaces it.
    pub(crate) fn request(&mut self, tree: &StateTree<S>, target: S) -> Result<(), Error> {
        if self.terminated {
            return Ok(());
        }
        if self.phase == Phase::Exit {
            tracing::warn!(target_state = target.name(), "transition rejected during exit");
            return Err(Error::InvalidPhase { phase: self.phase });
        }
        let Some(node) = tree.lookup(target) else {
            tracing::warn!(target_state = target.name(), "transition to unknown state");
            return Err(Error::UnknownState {
                state: target.name().to_string(),
            });
        };
        if let Some(replaced) = self.pending.replace(node) {
            tracing::trace!(
                replaced = tree.node(replaced).name(),
                target_state = target.name(),
                "pending transition overwritten"
            );
        }
        Ok(())
    }

    pub(crate) fn terminate(&mut self, value: Option<i32>) {
        self.terminated = true;
        if value.is_some() {
            self.terminate_value = value;
        }
    }
}
