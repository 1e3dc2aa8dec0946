//! Arbor: a hierarchical state machine engine
//!
//! States are nested in a tree. Events go to the active leaf first and
//! bubble to its ancestors until one handles them. A transition runs only
//! the exit and entry hooks between the source and the destination, never
//! those of their common ancestors.
//!
//! # Core Concepts
//!
//! - **StateId**: caller-defined identity of a state, usually a plain enum
//! - **Scope**: fluent registration of states, hooks and initial children
//! - **Machine**: owns the tree and the caller's context; driven by `tick`
//!   and `dispatch`
//! - **Handle**: what a hook sees; transitions requested through it are
//!   deferred until the current operation settles
//!
//! # Example
//!
//! ```rust
//! use arbor::{state_enum, Machine, Outcome};
//!
//! state_enum! {
//!     enum Player {
//!         Stopped,
//!         Active,
//!         Playing,
//!         Paused,
//!     }
//! }
//!
//! let mut machine: Machine<Player, Vec<&'static str>> = Machine::new(Vec::new());
//! machine
//!     .start(Player::Stopped, |root| {
//!         root.state(Player::Stopped)?.on_run(|m, _| {
//!             m.transition(Player::Active).ok();
//!             Outcome::Handled
//!         });
//!         root.state(Player::Active)?
//!             .initial(Player::Playing)
//!             .on_entry(|m| m.context_mut().push("enter Active"))
//!             .with(|active| {
//!                 active
//!                     .state(Player::Playing)?
//!                     .on_entry(|m| m.context_mut().push("enter Playing"));
//!                 active.state(Player::Paused)?;
//!                 Ok(())
//!             })?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! machine.tick().unwrap();
//! assert_eq!(machine.current_state(), Some(Player::Playing));
//! assert_eq!(machine.context(), &vec!["enter Active", "enter Playing"]);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod matcher;

// Re-export commonly used types
pub use builder::{ConfigError, Scope, StateBuilder, TreeViolation};
pub use config::MachineConfig;
pub use crate::core::{NodeId, Outcome, StateId, StateTree, TransitionHistory, TransitionRecord};
pub use engine::{Error, Handle, Machine, Phase};
pub use matcher::{match_event, match_event_with, CastPolicy, Downcast, Matcher};
