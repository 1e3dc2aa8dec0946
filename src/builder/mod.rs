//! Configuration of the state tree.
//!
//! States are registered through a [`Scope`] handed to
//! [`Machine::start`](crate::Machine::start). Each registered state yields a
//! [`StateBuilder`] for its hooks, its initial child and a nested scope for
//! its children. The declared tree is validated as a whole before the
//! machine starts.

pub mod error;
pub mod macros;
mod registry;
mod scope;
mod validate;

pub use error::{ConfigError, TreeViolation};
pub use registry::{ActionFn, Registry, RunFn};
pub use scope::{Scope, StateBuilder};
