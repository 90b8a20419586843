//! # Router Errors
//!
//! Only wiring mistakes are errors. Actions that a navigator simply does not
//! handle are logged and dropped by the store, and underflow (`GoBack` on a
//! single-entry stack) is a defined no-op.

use thiserror::Error;

use crate::core::action::NavigationAction;

/// A programming error in the route table wiring. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// An action or snapshot referenced a name no navigator in the tree knows.
    #[error("unknown route: {name}")]
    UnknownRoute { name: String },

    /// A mounted route has no registered screen builder.
    #[error("no screen registered for route: {name}")]
    MissingScreen { name: String },

    #[error("duplicate route name in table: {name}")]
    DuplicateRoute { name: String },

    #[error("route table has no routes")]
    EmptyRouteTable,

    /// `initial_route_name` is not part of the table.
    #[error("initial route {name} is not in the route table")]
    InvalidInitialRoute { name: String },

    /// The snapshot is structurally wrong for the navigator it seeds.
    #[error("invalid initial state: {0}")]
    InvalidSnapshot(String),

    #[error("failed to parse initial state: {0}")]
    Parse(String),
}

/// Logged, never returned: actions may legitimately target a navigator that
/// is not in the focused chain.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("action {action:?} was not handled by any navigator")]
pub struct UnhandledActionWarning {
    pub action: NavigationAction,
}
