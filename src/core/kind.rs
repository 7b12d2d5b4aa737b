//! State kinds and the per-instance lifecycle status.
//!
//! A kind names one state implementation. It is the key the registry caches
//! instances under and the target of every transition request.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier of a state implementation.
///
/// Kinds are plain values, usually a fieldless enum with one variant per
/// state. Use the [`state_kind!`](crate::state_kind) macro to derive
/// everything for such an enum.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: kinds are registry keys
/// - `Debug`: kinds show up in diagnostics
/// - `Serialize` + `Deserialize`: kinds are recorded in history and snapshots
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateKind;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Screen {
///     Title,
///     Level,
/// }
///
/// impl StateKind for Screen {
///     fn name(&self) -> &str {
///         match self {
///             Self::Title => "Title",
///             Self::Level => "Level",
///         }
///     }
/// }
///
/// assert_eq!(Screen::Level.name(), "Level");
/// ```
pub trait StateKind:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Human readable name used in logs and error messages.
    fn name(&self) -> &str;
}

/// Where a state instance is in its lifecycle.
///
/// At most one instance of a machine is `Executing` or `Exiting` at any time:
/// the active one. Every other instance is `Inactive`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalStatus {
    /// Not the active state.
    #[default]
    Inactive,
    /// Active and running its main body.
    Executing,
    /// Active, told to step down, and running its own cleanup.
    Exiting,
}

impl InternalStatus {
    /// True for `Executing` and `Exiting`.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestKind {
        Menu,
        Play,
    }

    impl StateKind for TestKind {
        fn name(&self) -> &str {
            match self {
                Self::Menu => "Menu",
                Self::Play => "Play",
            }
        }
    }

    #[test]
    fn kind_name_returns_correct_value() {
        assert_eq!(TestKind::Menu.name(), "Menu");
        assert_eq!(TestKind::Play.name(), "Play");
    }

    #[test]
    fn kind_serializes_correctly() {
        let kind = TestKind::Play;
        let json = serde_json::to_string(&kind).unwrap();
        let deserialized: TestKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, deserialized);
    }

    #[test]
    fn status_defaults_to_inactive() {
        assert_eq!(InternalStatus::default(), InternalStatus::Inactive);
    }

    #[test]
    fn only_inactive_is_not_active() {
        assert!(!InternalStatus::Inactive.is_active());
        assert!(InternalStatus::Executing.is_active());
        assert!(InternalStatus::Exiting.is_active());
    }
}
