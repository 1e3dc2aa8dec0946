//! Runtime of the state machine.
//!
//! The [`Machine`] owns the configured tree and its bookkeeping. Hooks see
//! it through a [`Handle`]; transitions they request are applied by the
//! transition engine once the current operation settles.

mod context;
mod dispatch;
mod error;
mod handle;
mod machine;
mod transition;

pub use context::Phase;
pub use error::Error;
pub use handle::Handle;
pub use machine::Machine;
