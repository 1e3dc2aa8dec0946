//! Transition history tracking.
//!
//! Keeps a bounded record of the transitions a machine has applied, oldest
//! first. Records are serializable whenever the state identity is.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use arbor::core::{StateId, TransitionRecord};
/// use chrono::Utc;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Door { Open, Closed }
///
/// impl StateId for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// let record = TransitionRecord {
///     from: Some(Door::Open),
///     to: Door::Closed,
///     timestamp: Utc::now(),
///     step: 1,
/// };
/// assert_eq!(record.to, Door::Closed);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<S> {
    /// Leaf the transition started from, `None` for the initial activation
    pub from: Option<S>,
    /// Leaf the transition resolved to
    pub to: S,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
    /// Position of this transition within its chain (1 for the first one
    /// applied by an operation)
    pub step: usize,
}

/// Bounded, ordered history of applied transitions.
///
/// Once `capacity` records are held, recording a new one evicts the oldest.
/// A capacity of 0 disables recording.
///
/// # Example
///
/// ```rust
/// use arbor::core::{StateId, TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Step { A, B, C }
///
/// impl StateId for Step {
///     fn name(&self) -> &str {
///         match self {
///             Self::A => "A",
///             Self::B => "B",
///             Self::C => "C",
///         }
///     }
/// }
///
/// let mut history = TransitionHistory::with_capacity(8);
/// history.record(TransitionRecord { from: Some(Step::A), to: Step::B, timestamp: Utc::now(), step: 1 });
/// history.record(TransitionRecord { from: Some(Step::B), to: Step::C, timestamp: Utc::now(), step: 1 });
///
/// assert_eq!(history.get_path(), vec![&Step::A, &Step::B, &Step::C]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory<S> {
    capacity: usize,
    transitions: VecDeque<TransitionRecord<S>>,
}

impl<S: StateId> Default for TransitionHistory<S> {
    fn default() -> Self {
        Self::with_capacity(32)
    }
}

impl<S: StateId> TransitionHistory<S> {
    /// Create an empty history holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    /// Maximum number of records kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: TransitionRecord<S>) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }

    /// Get the path of leaves traversed.
    ///
    /// Returns the `from` leaf of the oldest record (when it has one), then
    /// the `to` leaf of each record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(from) = self.transitions.front().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Time between the oldest and the newest record.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Iterate over records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord<S>> {
        self.transitions.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<S>> {
        self.transitions.back()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if no record is held.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
