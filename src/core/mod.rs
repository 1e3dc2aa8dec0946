//! Core state machine types and logic.
//!
//! This module contains the passive parts of the machine:
//! - State identities via the `StateId` trait
//! - The node arena and its handles
//! - Pure tree topology functions (ancestry, LCA, entry paths)
//! - Bounded transition history
//!
//! Nothing in this module runs hooks.

mod history;
mod node;
mod state;
pub mod topology;

pub use history::{TransitionHistory, TransitionRecord};
pub use node::{Node, NodeId, StateTree};
pub use state::{Outcome, StateId};
pub use topology::Topology;
