//! Identity and hook outcome types for state machine states.
//!
//! A state in this crate is data, not behaviour: the identity is a small
//! caller-defined key, and behaviour is attached separately as hooks when the
//! tree is configured.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identities.
///
/// Identities are small comparable keys (usually fieldless enums) that are
/// unique within one machine instance.
///
/// # Required Traits
///
/// - `Copy`: identities are passed around by value
/// - `Eq` + `Hash`: identities key the state registry
/// - `Debug`: identities appear in logs and errors
///
/// # Example
///
/// ```rust
/// use arbor::core::StateId;
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
/// assert_eq!(Light::On.name(), "On");
/// ```
pub trait StateId: Copy + Eq + Hash + Debug + 'static {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Result of a run hook.
///
/// `Propagate` hands the event to the parent state; `Handled` stops
/// bubbling. A state without a run hook behaves as if it returned
/// `Propagate`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Event handled, stop propagation.
    Handled,
    /// Event not handled, continue to the parent.
    #[default]
    Propagate,
}

impl Outcome {
    /// Check if this outcome stops bubbling.
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}
