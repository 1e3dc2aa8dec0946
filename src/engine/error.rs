//! Runtime errors of the machine.

use crate::builder::ConfigError;
use crate::engine::Phase;
use thiserror::Error;

/// Errors reported by machine operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Configuration was rejected by `start`.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `transition` was requested while exit hooks were running.
    #[error("Cannot transition during {phase:?} phase")]
    InvalidPhase { phase: Phase },

    /// `transition` targeted a state that is not registered.
    #[error("Target state {state} not registered")]
    UnknownState { state: String },

    /// More chained transitions than allowed were requested by one
    /// operation; the machine has been stopped.
    #[error("Transition loop detected: more than {limit} chained transitions")]
    TransitionLoopDetected { limit: usize },
}
