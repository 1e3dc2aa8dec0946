//! Hierarchical state machine driven by an explicit caller loop.

use crate::builder::{ConfigError, Registry, Scope};
use crate::config::MachineConfig;
use crate::core::{Outcome, StateId, StateTree, TransitionHistory};
use crate::engine::context::MachineContext;
use crate::engine::transition::Engine;
use crate::engine::{Error, Phase};

/// Hierarchical state machine.
///
/// `S` identifies states, `C` is the caller-owned context handed to every
/// hook and `E` is the event type passed to run hooks. Use `dyn Any` as
/// the event type together with [`match_event`](crate::match_event) for
/// typed dispatch.
///
/// # Example
///
/// ```rust
/// use arbor::{Machine, Outcome, StateId};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Light {
///     Off,
///     On,
/// }
///
/// impl StateId for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// let mut machine: Machine<Light, u32> = Machine::new(0);
/// machine
///     .start(Light::Off, |root| {
///         root.state(Light::Off)?.on_run(|m, _| {
///             m.transition(Light::On).ok();
///             Outcome::Handled
///         });
///         root.state(Light::On)?.on_entry(|m| *m.context_mut() += 1);
///         Ok(())
///     })
///     .unwrap();
///
/// machine.tick().unwrap();
/// assert_eq!(machine.current_state(), Some(Light::On));
/// assert_eq!(*machine.context(), 1);
/// ```
pub struct Machine<S: StateId, C, E: ?Sized = ()> {
    registry: Registry<S, C, E>,
    core: MachineContext<S, C>,
    config: MachineConfig,
}

impl<S: StateId, C, E: ?Sized> Machine<S, C, E> {
    /// Create a stopped machine owning `context`, with default bounds.
    pub fn new(context: C) -> Self {
        Self::with_config(context, MachineConfig::default())
    }

    /// Create a stopped machine with explicit bounds.
    pub fn with_config(context: C, config: MachineConfig) -> Self {
        Self {
            registry: Registry::new(),
            core: MachineContext::new(context, config.history_capacity),
            config,
        }
    }

    fn engine(&mut self) -> Engine<'_, S, C, E> {
        Engine {
            registry: &self.registry,
            core: &mut self.core,
            config: &self.config,
        }
    }

    /// Configure the state tree and activate `initial`.
    ///
    /// `configure` registers every state on the root scope. The initial
    /// state is resolved to its deepest initial leaf and entered top-down,
    /// after the root's own entry hook. Transitions requested by entry
    /// hooks are applied before returning.
    ///
    /// A terminated machine may be started again: the tree is rebuilt and
    /// all bookkeeping but the user context is cleared.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::AlreadyStarted`] if the machine is running
    /// - any [`ConfigError`] produced while configuring
    /// - [`ConfigError::UnknownInitialState`] if `initial` is not registered
    /// - [`Error::TransitionLoopDetected`] if startup hooks chain too many
    ///   transitions
    ///
    /// A configuration error leaves the machine untouched.
    pub fn start<F>(&mut self, initial: S, configure: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Scope<'_, S, C, E>) -> Result<(), ConfigError>,
    {
        if self.core.started && !self.core.terminated {
            return Err(ConfigError::AlreadyStarted.into());
        }

        let mut registry = Registry::new();
        configure(&mut Scope::root(&mut registry))?;
        registry.finalize(&self.config)?;
        let initial_node =
            registry
                .tree
                .lookup(initial)
                .ok_or_else(|| ConfigError::UnknownInitialState {
                    state: initial.name().to_string(),
                })?;

        tracing::debug!(
            initial = initial.name(),
            states = registry.tree.len() - 1,
            "starting machine"
        );

        self.registry = registry;
        self.core.reset();
        self.core.started = true;

        let mut engine = self.engine();
        engine.activate(initial_node);
        engine.settle()
    }

    /// Stop the machine. Further operations are no-ops until restarted.
    pub fn stop(&mut self) {
        tracing::debug!("stopping machine");
        self.core.terminate(None);
    }

    /// Stop the machine with a termination value.
    pub fn terminate(&mut self, value: i32) {
        tracing::debug!(value, "terminating machine");
        self.core.terminate(Some(value));
    }

    /// Request a transition to `target` from outside any hook.
    ///
    /// Only records the request; no hook runs here. The next `dispatch` or
    /// `tick` offers its event to the active leaf and then applies the
    /// request, unless a run hook replaced it first.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownState`] if `target` is not registered, including
    /// before the first `start`
    pub fn transition(&mut self, target: S) -> Result<(), Error> {
        self.core.request(&self.registry.tree, target)
    }

    /// Dispatch `event` to the active leaf, bubbling unhandled events to
    /// its ancestors, then apply any requested transition.
    ///
    /// Returns whether some state handled the event. A machine that is not
    /// started or already terminated ignores the event.
    ///
    /// # Errors
    ///
    /// [`Error::TransitionLoopDetected`] if the resulting transitions chain
    /// past the configured bound.
    pub fn dispatch(&mut self, event: &E) -> Result<Outcome, Error> {
        if !self.core.started || self.core.terminated {
            return Ok(Outcome::Propagate);
        }
        let mut engine = self.engine();
        let outcome = engine.bubble(event);
        engine.settle()?;
        Ok(outcome)
    }

    /// Dispatch the default event.
    pub fn tick(&mut self) -> Result<Outcome, Error>
    where
        E: Default + Sized,
    {
        self.dispatch(&E::default())
    }

    /// Active leaf, `None` before start or while only the root is active.
    pub fn current_state(&self) -> Option<S> {
        self.registry.tree.id_of(self.core.active)
    }

    /// Leaf that was active before the last applied transition.
    pub fn previous_state(&self) -> Option<S> {
        self.registry.tree.id_of(self.core.previous)
    }

    /// Check if `start` has succeeded.
    pub fn is_started(&self) -> bool {
        self.core.started
    }

    /// Check if the machine has been stopped or terminated.
    pub fn is_terminated(&self) -> bool {
        self.core.terminated
    }

    /// Value passed to the last `terminate`, if any.
    pub fn terminate_value(&self) -> Option<i32> {
        self.core.terminate_value
    }

    /// Check if a transition is recorded but not yet applied.
    pub fn has_pending_transition(&self) -> bool {
        self.core.pending.is_some()
    }

    /// Engine phase; `Idle` whenever no operation is running.
    pub fn phase(&self) -> Phase {
        self.core.phase
    }

    /// Shared user context.
    pub fn context(&self) -> &C {
        &self.core.user
    }

    /// Mutable user context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.core.user
    }

    /// Swap in a new user context, returning the old one.
    pub fn replace_context(&mut self, context: C) -> C {
        std::mem::replace(&mut self.core.user, context)
    }

    /// Consume the machine, returning the user context.
    pub fn into_context(self) -> C {
        self.core.user
    }

    /// Transitions applied since the last start.
    pub fn history(&self) -> &TransitionHistory<S> {
        &self.core.history
    }

    /// Bounds the machine was created with.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Structure of the configured states.
    pub fn tree(&self) -> &StateTree<S> {
        &self.registry.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeViolation;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Door {
        Closed,
        Open,
        Locked,
        Unlocked,
    }

    impl StateId for Door {
        fn name(&self) -> &str {
            match self {
                Self::Closed => "Closed",
                Self::Open => "Open",
                Self::Locked => "Locked",
                Self::Unlocked => "Unlocked",
            }
        }
    }

    type Log = Vec<String>;

    fn push(m: &mut crate::engine::Handle<'_, Door, Log>, what: &str) {
        m.context_mut().push(what.to_string());
    }

    fn configure(root: &mut Scope<'_, Door, Log, ()>) -> Result<(), ConfigError> {
        root.state(Door::Closed)?
            .initial(Door::Locked)
            .on_entry(|m| push(m, "enter Closed"))
            .on_exit(|m| push(m, "exit Closed"))
            .with(|closed| {
                closed
                    .state(Door::Locked)?
                    .on_entry(|m| push(m, "enter Locked"))
                    .on_exit(|m| push(m, "exit Locked"))
                    .on_run(|m, _| {
                        m.transition(Door::Unlocked).ok();
                        Outcome::Handled
                    });
                closed
                    .state(Door::Unlocked)?
                    .on_entry(|m| push(m, "enter Unlocked"))
                    .on_exit(|m| push(m, "exit Unlocked"));
                Ok(())
            })?;
        root.state(Door::Open)?
            .on_entry(|m| push(m, "enter Open"))
            .on_exit(|m| push(m, "exit Open"));
        Ok(())
    }

    #[test]
    fn start_drills_to_initial_leaf() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        machine.start(Door::Closed, configure).unwrap();

        assert_eq!(machine.current_state(), Some(Door::Locked));
        assert_eq!(machine.context(), &vec!["enter Closed", "enter Locked"]);
        assert!(machine.is_started());
        assert_eq!(machine.phase(), Phase::Idle);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        machine.start(Door::Closed, configure).unwrap();

        assert_eq!(
            machine.start(Door::Closed, configure),
            Err(Error::Config(ConfigError::AlreadyStarted))
        );
    }

    #[test]
    fn unknown_initial_state_is_rejected() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        let result = machine.start(Door::Open, |root| {
            root.state(Door::Closed)?;
            Ok(())
        });

        assert_eq!(
            result,
            Err(Error::Config(ConfigError::UnknownInitialState {
                state: "Open".to_string()
            }))
        );
        assert!(!machine.is_started());
    }

    #[test]
    fn invalid_initial_declaration_is_reported() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        let result = machine.start(Door::Closed, |root| {
            root.state(Door::Closed)?.initial(Door::Open);
            root.state(Door::Open)?;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidTree { ref violations }))
                if matches!(violations[..], [TreeViolation::InitialNotDescendant { .. }])
        ));
    }

    #[test]
    fn sibling_transition_skips_common_parent() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        machine.start(Door::Closed, configure).unwrap();
        machine.context_mut().clear();

        machine.tick().unwrap();

        assert_eq!(machine.current_state(), Some(Door::Unlocked));
        assert_eq!(machine.previous_state(), Some(Door::Locked));
        assert_eq!(machine.context(), &vec!["exit Locked", "enter Unlocked"]);
    }

    #[test]
    fn caller_transition_waits_for_next_dispatch() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        machine.start(Door::Closed, configure).unwrap();
        machine.tick().unwrap();
        machine.context_mut().clear();

        machine.transition(Door::Open).unwrap();

        assert!(machine.has_pending_transition());
        assert_eq!(machine.current_state(), Some(Door::Unlocked));
        assert!(machine.context().is_empty());

        assert_eq!(machine.tick(), Ok(Outcome::Propagate));

        assert!(!machine.has_pending_transition());
        assert_eq!(machine.current_state(), Some(Door::Open));
        assert_eq!(
            machine.context(),
            &vec!["exit Unlocked", "exit Closed", "enter Open"]
        );
    }

    #[test]
    fn run_hook_request_replaces_caller_request() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        machine.start(Door::Closed, configure).unwrap();

        machine.transition(Door::Open).unwrap();
        machine.tick().unwrap();

        assert_eq!(machine.current_state(), Some(Door::Unlocked));
    }

    #[test]
    fn transition_before_start_is_unknown() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());

        assert_eq!(
            machine.transition(Door::Open),
            Err(Error::UnknownState {
                state: "Open".to_string()
            })
        );
    }

    #[test]
    fn stopped_machine_ignores_everything() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        machine.start(Door::Closed, configure).unwrap();
        machine.stop();
        machine.context_mut().clear();

        assert_eq!(machine.tick(), Ok(Outcome::Propagate));
        assert_eq!(machine.transition(Door::Open), Ok(()));
        assert_eq!(machine.current_state(), Some(Door::Locked));
        assert!(machine.context().is_empty());
    }

    #[test]
    fn restart_after_termination_resets_bookkeeping() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        machine.start(Door::Closed, configure).unwrap();
        machine.tick().unwrap();
        machine.terminate(3);
        assert_eq!(machine.terminate_value(), Some(3));

        machine.start(Door::Open, configure).unwrap();

        assert!(!machine.is_terminated());
        assert_eq!(machine.terminate_value(), None);
        assert_eq!(machine.current_state(), Some(Door::Open));
        assert_eq!(machine.previous_state(), None);
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn history_records_applied_transitions() {
        let mut machine: Machine<Door, Log> = Machine::new(Vec::new());
        machine.start(Door::Closed, configure).unwrap();
        machine.tick().unwrap();
        machine.transition(Door::Open).unwrap();
        machine.tick().unwrap();

        let path: Vec<_> = machine.history().get_path().into_iter().copied().collect();
        assert_eq!(path, vec![Door::Locked, Door::Unlocked, Door::Open]);
        assert_eq!(machine.history().last().map(|r| r.from), Some(Some(Door::Unlocked)));
    }

    #[test]
    fn disabled_history_records_nothing() {
        let config = MachineConfig::default().with_history_capacity(0);
        let mut machine: Machine<Door, Log> = Machine::with_config(Vec::new(), config);
        machine.start(Door::Closed, configure).unwrap();
        machine.tick().unwrap();

        assert!(machine.history().is_empty());
    }

    #[test]
    fn context_passthrough() {
        let mut machine: Machine<Door, Log> = Machine::new(vec!["old".to_string()]);
        let old = machine.replace_context(vec!["new".to_string()]);

        assert_eq!(old, vec!["old"]);
        assert_eq!(machine.into_context(), vec!["new"]);
    }
}
