//! Macros for ergonomic state machine construction.

/// Declare a plain enum of state identities.
///
/// Derives the traits a state identity needs and implements
/// [`StateId`](crate::StateId) with each variant's name.
///
/// # Example
///
/// ```
/// use arbor::{state_enum, StateId};
///
/// state_enum! {
///     pub enum Player {
///         Stopped,
///         Playing,
///         Paused,
///     }
/// }
///
/// assert_eq!(Player::Paused.name(), "Paused");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
