//! Fluent configuration of the state tree.
//!
//! A [`Scope`] registers states under one owner (the synthetic root or a
//! state). Each registered state returns a [`StateBuilder`] that attaches
//! hooks and opens a nested scope for its children. Calls are order
//! independent.

use crate::builder::error::ConfigError;
use crate::builder::registry::Registry;
use crate::core::{NodeId, Outcome, StateId};
use crate::engine::Handle;

/// Registers states under one owner.
pub struct Scope<'r, S: StateId, C, E: ?Sized> {
    registry: &'r mut Registry<S, C, E>,
    owner: NodeId,
}

impl<'r, S: StateId, C, E: ?Sized> Scope<'r, S, C, E> {
    pub(crate) fn root(registry: &'r mut Registry<S, C, E>) -> Self {
        Self {
            registry,
            owner: NodeId::ROOT,
        }
    }

    /// Register a state under this scope's owner.
    ///
    /// Fails with [`ConfigError::DuplicateState`] if `id` is already
    /// registered anywhere in the machine.
    pub fn state(&mut self, id: S) -> Result<StateBuilder<'_, S, C, E>, ConfigError> {
        let node = self.registry.register(id, self.owner)?;
        Ok(StateBuilder {
            registry: &mut *self.registry,
            node,
        })
    }

    /// Attach an entry hook to this scope's owner.
    ///
    /// On the root scope the hook fires once per `start`, before any state
    /// is entered.
    pub fn on_entry<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Handle<'_, S, C>) + 'static,
    {
        self.registry.hooks_mut(self.owner).entry = Some(Box::new(f));
        self
    }

    /// Attach a run hook to this scope's owner.
    ///
    /// On the root scope the hook is the last fallback of event bubbling.
    pub fn on_run<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Handle<'_, S, C>, &E) -> Outcome + 'static,
    {
        self.registry.hooks_mut(self.owner).run = Some(Box::new(f));
        self
    }
}

/// Attaches hooks and children to one registered state.
pub struct StateBuilder<'r, S: StateId, C, E: ?Sized> {
    registry: &'r mut Registry<S, C, E>,
    node: NodeId,
}

impl<'r, S: StateId, C, E: ?Sized> StateBuilder<'r, S, C, E> {
    /// Handle of the registered state.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Set the entry action.
    pub fn on_entry<F>(self, f: F) -> Self
    where
        F: Fn(&mut Handle<'_, S, C>) + 'static,
    {
        self.registry.hooks_mut(self.node).entry = Some(Box::new(f));
        self
    }

    /// Set the run action.
    pub fn on_run<F>(self, f: F) -> Self
    where
        F: Fn(&mut Handle<'_, S, C>, &E) -> Outcome + 'static,
    {
        self.registry.hooks_mut(self.node).run = Some(Box::new(f));
        self
    }

    /// Set the exit action.
    pub fn on_exit<F>(self, f: F) -> Self
    where
        F: Fn(&mut Handle<'_, S, C>) + 'static,
    {
        self.registry.hooks_mut(self.node).exit = Some(Box::new(f));
        self
    }

    /// Declare the child to drill into when this state is activated.
    ///
    /// The child may be registered later; it is resolved when the machine
    /// starts and must be nested inside this state.
    pub fn initial(self, child: S) -> Self {
        self.registry.hooks_mut(self.node).initial = Some(child);
        self
    }

    /// Override the display name used in logs and errors.
    pub fn name(self, name: &str) -> Self {
        self.registry.tree.set_name(self.node, name.to_string());
        self
    }

    /// Register children of this state.
    pub fn with<F>(self, f: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut Scope<'_, S, C, E>) -> Result<(), ConfigError>,
    {
        let mut scope = Scope {
            registry: self.registry,
            owner: self.node,
        };
        f(&mut scope)
    }
}
