//! # Router Policies
//!
//! One `Router` per navigator kind. The kind is a plain tag; the policy
//! object behind it is picked once, when the `NavigatorConfig` is built.
//!
//! - [`stack`]: push/pop history, fresh entry per visit
//! - [`tab`]: one entry per route, created on first visit and kept
//! - [`drawer`]: tabs plus an open/closed drawer

pub mod drawer;
pub mod stack;
pub mod tab;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::action::NavigationAction;
use crate::core::error::ConfigurationError;
use crate::core::route::{NavigatorConfig, Params, RouteDefinition};
use crate::core::state::{InitialState, NavigationState};

pub use drawer::DrawerRouter;
pub use stack::StackRouter;
pub use tab::TabRouter;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    #[default]
    Stack,
    Tabs,
    Drawer,
}

impl RouterKind {
    pub fn router(self) -> Box<dyn Router> {
        match self {
            RouterKind::Stack => Box::new(StackRouter),
            RouterKind::Tabs => Box::new(TabRouter),
            RouterKind::Drawer => Box::new(DrawerRouter),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouterKind::Stack => "stack",
            RouterKind::Tabs => "tabs",
            RouterKind::Drawer => "drawer",
        }
    }
}

impl fmt::Display for RouterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A routing policy. Pure: no I/O, no mutation of the input state.
pub trait Router: fmt::Debug + Send + Sync {
    fn initial_state(&self, config: &NavigatorConfig) -> NavigationState;

    /// Builds a state from a literal snapshot. Empty snapshots fall back to
    /// `initial_state`.
    fn rehydrate(
        &self,
        snapshot: &InitialState,
        config: &NavigatorConfig,
    ) -> Result<NavigationState, ConfigurationError>;

    /// `None` means "not handled here"; the caller may offer it to a parent.
    fn state_for_action(
        &self,
        state: &NavigationState,
        action: &NavigationAction,
        config: &NavigatorConfig,
    ) -> Option<NavigationState>;

    fn should_action_change_focus(&self, action: &NavigationAction) -> bool {
        action.changes_focus()
    }

    /// When true, `action` is offered to this navigator before its focused child.
    fn intercepts(&self, _state: &NavigationState, _action: &NavigationAction) -> bool {
        false
    }
}

/// Params for an entry being refocused. No params keeps what is there.
pub(crate) fn next_params(
    def: &RouteDefinition,
    current: Option<&Params>,
    params: Option<&Params>,
    merge: bool,
) -> Option<Params> {
    match (params, merge) {
        (None, _) => current.cloned(),
        (Some(p), true) => {
            let mut merged = current.cloned().unwrap_or_default();
            merged.extend(p.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(merged)
        }
        (Some(p), false) => def.params_with_defaults(Some(p)),
    }
}

/// `SetParams`: shared by every kind.
pub(crate) fn set_params(
    state: &NavigationState,
    key: &str,
    params: &Params,
) -> Option<NavigationState> {
    let position = state.routes.iter().position(|r| r.key == key)?;
    let mut next = state.clone();
    let route = &mut next.routes[position];
    let merged = route.params.get_or_insert_with(Params::new);
    merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
    Some(next)
}
