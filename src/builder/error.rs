//! Configuration errors for state trees.

use thiserror::Error;

/// Errors that can occur when configuring and starting a machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("State {state} registered twice. State identities must be unique")]
    DuplicateState { state: String },

    #[error("Initial state {state} not registered")]
    UnknownInitialState { state: String },

    #[error("Machine already started. Call .stop() before starting again")]
    AlreadyStarted,

    #[error("Invalid state tree ({} violation(s)): {}", .violations.len(), describe(.violations))]
    InvalidTree { violations: Vec<TreeViolation> },
}

/// Structural problems found while validating a declared tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeViolation {
    #[error("initial child {initial} of {state} is not registered")]
    UnknownInitial { state: String, initial: String },

    #[error("initial child {initial} of {state} is not nested inside it")]
    InitialNotDescendant { state: String, initial: String },

    #[error("initial chain from {state} is deeper than {limit} levels")]
    DrillTooDeep { state: String, limit: usize },
}

fn describe(violations: &[TreeViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_tree_lists_every_violation() {
        let error = ConfigError::InvalidTree {
            violations: vec![
                TreeViolation::UnknownInitial {
                    state: "On".to_string(),
                    initial: "Idle".to_string(),
                },
                TreeViolation::DrillTooDeep {
                    state: "Root".to_string(),
                    limit: 4,
                },
            ],
        };

        let message = error.to_string();
        assert!(message.contains("2 violation(s)"));
        assert!(message.contains("initial child Idle of On is not registered"));
        assert!(message.contains("deeper than 4 levels"));
    }
}
