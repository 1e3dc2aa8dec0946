//! Typed dispatch helper for run hooks.
//!
//! A run hook receives the machine's event type as is. When that type is
//! type-erased (`dyn Any`) or a closed enum, [`match_event`] tries a series
//! of typed handlers in order and runs the first one whose event type
//! matches. How an event is checked against a handler's type is decided by
//! a [`CastPolicy`].
//!
//! # Example
//!
//! ```rust
//! use std::any::Any;
//! use arbor::{match_event, Machine, Outcome, StateId};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! struct Idle;
//!
//! impl StateId for Idle {
//!     fn name(&self) -> &str {
//!         "Idle"
//!     }
//! }
//!
//! struct Click(u32);
//!
//! let mut machine: Machine<Idle, u32, dyn Any> = Machine::new(0);
//! machine
//!     .start(Idle, |root| {
//!         root.state(Idle)?.on_run(|m, event| {
//!             match_event(m, event)
//!                 .on::<Click, _>(|m, click| {
//!                     *m.context_mut() += click.0;
//!                     Outcome::Handled
//!                 })
//!                 .result()
//!         });
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! machine.dispatch(&Click(7)).unwrap();
//! assert_eq!(*machine.context(), 7);
//! ```

use std::any::Any;
use std::marker::PhantomData;

use crate::core::{Outcome, StateId};
use crate::engine::Handle;

/// Decides whether an event of type `E` can be viewed as a `T`.
pub trait CastPolicy<E: ?Sized, T> {
    fn cast(event: &E) -> Option<&T>;
}

/// Default policy: a checked downcast of type-erased events.
#[derive(Clone, Copy, Debug, Default)]
pub struct Downcast;

impl<T: Any> CastPolicy<dyn Any, T> for Downcast {
    fn cast(event: &dyn Any) -> Option<&T> {
        event.downcast_ref()
    }
}

impl<T: Any> CastPolicy<dyn Any + Send, T> for Downcast {
    fn cast(event: &(dyn Any + Send)) -> Option<&T> {
        event.downcast_ref()
    }
}

impl<T: Any> CastPolicy<Box<dyn Any>, T> for Downcast {
    fn cast(event: &Box<dyn Any>) -> Option<&T> {
        (**event).downcast_ref()
    }
}

/// Chain of typed handlers over one event.
///
/// Handlers are tried in the order they are added; once one matches, the
/// rest are skipped. Without a match the result is [`Outcome::Propagate`].
#[must_use = "call .result() to obtain the outcome"]
pub struct Matcher<'h, 'm, 'e, S: StateId, C, E: ?Sized, P = Downcast> {
    handle: &'h mut Handle<'m, S, C>,
    event: &'e E,
    outcome: Outcome,
    matched: bool,
    _policy: PhantomData<P>,
}

impl<'h, 'm, 'e, S: StateId, C, E: ?Sized, P> Matcher<'h, 'm, 'e, S, C, E, P> {
    fn new(handle: &'h mut Handle<'m, S, C>, event: &'e E) -> Self {
        Self {
            handle,
            event,
            outcome: Outcome::Propagate,
            matched: false,
            _policy: PhantomData,
        }
    }

    /// Run `f` if no handler matched yet and the event is a `T`.
    pub fn on<T, F>(mut self, f: F) -> Self
    where
        P: CastPolicy<E, T>,
        F: FnOnce(&mut Handle<'m, S, C>, &T) -> Outcome,
    {
        if !self.matched {
            if let Some(event) = P::cast(self.event) {
                self.outcome = f(&mut *self.handle, event);
                self.matched = true;
            }
        }
        self
    }

    /// Run `f` with the raw event if no handler matched.
    pub fn otherwise<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Handle<'m, S, C>, &E) -> Outcome,
    {
        if !self.matched {
            self.outcome = f(&mut *self.handle, self.event);
            self.matched = true;
        }
        self
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    pub fn result(&self) -> Outcome {
        self.outcome
    }
}

impl<S: StateId, C, E: ?Sized, P> From<Matcher<'_, '_, '_, S, C, E, P>> for Outcome {
    fn from(matcher: Matcher<'_, '_, '_, S, C, E, P>) -> Self {
        matcher.outcome
    }
}

/// Start matching `event` with the [`Downcast`] policy.
pub fn match_event<'h, 'm, 'e, S: StateId, C, E: ?Sized>(
    handle: &'h mut Handle<'m, S, C>,
    event: &'e E,
) -> Matcher<'h, 'm, 'e, S, C, E> {
    Matcher::new(handle, event)
}

/// Start matching `event` with a caller-supplied policy.
pub fn match_event_with<'h, 'm, 'e, P, S: StateId, C, E: ?Sized>(
    handle: &'h mut Handle<'m, S, C>,
    event: &'e E,
) -> Matcher<'h, 'm, 'e, S, C, E, P> {
    Matcher::new(handle, event)
}
