//! State registry: the node arena plus the hooks attached to each node.

use crate::builder::error::ConfigError;
use crate::builder::validate::validate_initials;
use crate::config::MachineConfig;
use crate::core::{NodeId, Outcome, StateId, StateTree};
use crate::engine::Handle;

/// Entry or exit action of a state.
pub type ActionFn<S, C> = Box<dyn Fn(&mut Handle<'_, S, C>)>;

/// Run action of a state, invoked with the dispatched event.
pub type RunFn<S, C, E> = Box<dyn Fn(&mut Handle<'_, S, C>, &E) -> Outcome>;

/// Independently attachable callbacks of one state.
pub(crate) struct Hooks<S: StateId, C, E: ?Sized> {
    pub(crate) entry: Option<ActionFn<S, C>>,
    pub(crate) run: Option<RunFn<S, C, E>>,
    pub(crate) exit: Option<ActionFn<S, C>>,
    pub(crate) initial: Option<S>,
}

impl<S: StateId, C, E: ?Sized> Default for Hooks<S, C, E> {
    fn default() -> Self {
        Self {
            entry: None,
            run: None,
            exit: None,
            initial: None,
        }
    }
}

/// Owns every state of one machine instance.
///
/// Populated during configuration; read-only while the machine runs.
pub struct Registry<S: StateId, C, E: ?Sized> {
    pub(crate) tree: StateTree<S>,
    pub(crate) hooks: Vec<Hooks<S, C, E>>,
}

impl<S: StateId, C, E: ?Sized> Default for Registry<S, C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, C, E: ?Sized> Registry<S, C, E> {
    /// Create a registry holding only the synthetic root.
    pub fn new() -> Self {
        Self {
            tree: StateTree::new(),
            hooks: vec![Hooks::default()],
        }
    }

    /// Structure of the registered states.
    pub fn tree(&self) -> &StateTree<S> {
        &self.tree
    }

    pub(crate) fn register(&mut self, id: S, parent: NodeId) -> Result<NodeId, ConfigError> {
        let node = self
            .tree
            .insert(id, parent)
            .ok_or_else(|| ConfigError::DuplicateState {
                state: id.name().to_string(),
            })?;
        self.hooks.push(Hooks::default());
        Ok(node)
    }

    pub(crate) fn hooks_mut(&mut self, node: NodeId) -> &mut Hooks<S, C, E> {
        &mut self.hooks[node.index()]
    }

    pub(crate) fn hooks(&self, node: NodeId) -> &Hooks<S, C, E> {
        &self.hooks[node.index()]
    }

    /// Resolve declared initial children into tree links.
    ///
    /// Every structural problem is reported at once.
    pub(crate) fn finalize(&mut self, config: &MachineConfig) -> Result<(), ConfigError> {
        let declared: Vec<(NodeId, S)> = self
            .tree
            .handles()
            .filter_map(|node| self.hooks[node.index()].initial.map(|id| (node, id)))
            .collect();

        let links = validate_initials(&self.tree, &declared, config.max_drill_depth)
            .map_err(|violations| ConfigError::InvalidTree { violations })?;

        for (owner, initial) in links {
            self.tree.set_initial(owner, initial);
        }
        Ok(())
    }
}
