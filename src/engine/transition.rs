//! Transition engine.
//!
//! Applies pending transitions: resolves the destination to a leaf, runs
//! exit hooks from the source up to the lowest common ancestor, then entry
//! hooks from the ancestor's child down to the destination. The ancestor's
//! own hooks never run. Requests made by hooks are only recorded; they are
//! applied here, one at a time, in a bounded loop.

use crate::builder::Registry;
use crate::config::MachineConfig;
use crate::core::topology::{entry_path, lowest_common_ancestor};
use crate::core::{NodeId, StateId, Topology, TransitionRecord};
use crate::engine::context::MachineContext;
use crate::engine::{Error, Handle, Phase};
use chrono::Utc;

/// One machine operation in progress.
pub(crate) struct Engine<'a, S: StateId, C, E: ?Sized> {
    pub(crate) registry: &'a Registry<S, C, E>,
    pub(crate) core: &'a mut MachineContext<S, C>,
    pub(crate) config: &'a MachineConfig,
}

impl<S: StateId, C, E: ?Sized> Engine<'_, S, C, E> {
    fn name(&self, node: NodeId) -> &str {
        self.registry.tree.node(node).name()
    }

    pub(crate) fn fire_entry(&mut self, node: NodeId) {
        let registry = self.registry;
        self.core.executing = Some(node);
        if let Some(entry) = &registry.hooks(node).entry {
            tracing::trace!(state = registry.tree.node(node).name(), "entry");
            entry(&mut Handle {
                tree: &registry.tree,
                core: &mut *self.core,
            });
        }
    }

    pub(crate) fn fire_exit(&mut self, node: NodeId) {
        let registry = self.registry;
        self.core.executing = Some(node);
        if let Some(exit) = &registry.hooks(node).exit {
            tracing::trace!(state = registry.tree.node(node).name(), "exit");
            exit(&mut Handle {
                tree: &registry.tree,
                core: &mut *self.core,
            });
        }
    }

    /// Initial activation: root entry hook, then the path down to the
    /// initial leaf.
    pub(crate) fn activate(&mut self, initial: NodeId) {
        self.core.active = Some(NodeId::ROOT);
        self.core.phase = Phase::Entry;
        self.fire_entry(NodeId::ROOT);
        if self.core.terminated {
            self.core.phase = Phase::Idle;
            return;
        }
        // The root's entry may already have redirected the machine.
        if self.core.pending.is_none() {
            self.apply(initial, 1);
        }
    }

    /// Apply one transition.
    ///
    /// Leaves the phase at `Entry` when an entry hook requested a new
    /// transition, so the next application starts from the state that
    /// requested it.
    pub(crate) fn apply(&mut self, destination: NodeId, step: usize) {
        let registry = self.registry;
        let tree = &registry.tree;
        let destination = tree.resolve_leaf(destination, self.config.max_drill_depth);

        let source = match (self.core.phase, self.core.executing) {
            (Phase::Entry, Some(executing)) => executing,
            _ => self.core.active.unwrap_or(NodeId::ROOT),
        };

        tracing::debug!(
            from = self.name(source),
            to = self.name(destination),
            step,
            "applying transition"
        );

        self.core.previous = self.core.active.filter(|node| !node.is_root());

        if source == destination {
            self.apply_self(destination, step);
            return;
        }

        let common = lowest_common_ancestor(tree, source, destination).unwrap_or(NodeId::ROOT);

        self.core.phase = Phase::Exit;
        let mut node = source;
        while node != common {
            self.fire_exit(node);
            let parent = tree.parent(node).unwrap_or(NodeId::ROOT);
            self.core.active = Some(parent);
            if self.core.terminated {
                self.core.phase = Phase::Idle;
                return;
            }
            node = parent;
        }

        self.record(source, destination, step);

        self.core.phase = Phase::Entry;
        let path = entry_path(tree, common, destination).unwrap_or_default();
        for node in path {
            self.fire_entry(node);
            self.core.active = Some(node);
            if self.core.terminated {
                self.core.phase = Phase::Idle;
                return;
            }
            if self.core.pending.is_some() {
                return;
            }
        }
        self.core.phase = Phase::Idle;
    }

    /// Exit then re-enter `node`, leaving its ancestors untouched.
    fn apply_self(&mut self, node: NodeId, step: usize) {
        self.core.phase = Phase::Exit;
        self.fire_exit(node);
        if self.core.terminated {
            self.core.phase = Phase::Idle;
            return;
        }

        self.record(node, node, step);

        self.core.phase = Phase::Entry;
        self.fire_entry(node);
        self.core.active = Some(node);
        if self.core.terminated || self.core.pending.is_none() {
            self.core.phase = Phase::Idle;
        }
    }

    fn record(&mut self, source: NodeId, destination: NodeId, step: usize) {
        let registry = self.registry;
        let tree = &registry.tree;
        let Some(to) = tree.node(destination).id() else {
            return;
        };
        self.core.history.record(TransitionRecord {
            from: tree.node(source).id(),
            to,
            timestamp: Utc::now(),
            step,
        });
    }

    /// Apply pending transitions until none is left.
    ///
    /// # Errors
    ///
    /// [`Error::TransitionLoopDetected`] once more than
    /// `max_chained_transitions` are applied; the machine is stopped.
    pub(crate) fn settle(&mut self) -> Result<(), Error> {
        let limit = self.config.max_chained_transitions;
        let mut step = 0;
        let result = loop {
            if self.core.terminated {
                break Ok(());
            }
            let Some(destination) = self.core.pending.take() else {
                break Ok(());
            };
            step += 1;
            if step > limit {
                tracing::warn!(limit, "transition loop detected, stopping machine");
                self.core.terminate(None);
                break Err(Error::TransitionLoopDetected { limit });
            }
            self.apply(destination, step);
        };
        self.core.phase = Phase::Idle;
        self.core.executing = None;
        result
    }
}
