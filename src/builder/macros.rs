//! Macros for ergonomic state kind declarations.

/// Declare a fieldless enum and implement [`StateKind`](crate::core::StateKind) for it.
///
/// # Example
///
/// ```
/// use tickstate::core::StateKind;
/// use tickstate::state_kind;
///
/// state_kind! {
///     pub enum Screen {
///         MainMenu,
///         Play,
///     }
/// }
///
/// assert_eq!(Screen::Play.name(), "Play");
/// ```
#[macro_export]
macro_rules! state_kind {
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
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateKind for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
