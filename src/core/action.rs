//! # Actions
//!
//! Everything that can happen to a navigator becomes a `NavigationAction`.
//! The user taps a card? That's `Navigate { name: "DogDetails", .. }`.
//! Hardware back? That's `GoBack`.
//!
//! A router takes the current state and an action and returns the next
//! state, or `None` if the action is not its business. No side effects here.
//!
//! ```text
//! State + Action  →  Router::state_for_action()  →  Some(New State) | None
//! ```

use crate::core::route::Params;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationAction {
    /// Go to `name`. Stacks push (or refocus, see `NavigateMode`), tabs switch.
    Navigate {
        name: String,
        params: Option<Params>,
        /// Merge `params` into the existing entry's params instead of replacing them.
        merge: bool,
    },
    GoBack,
    /// Merge `params` into the entry with `key`.
    SetParams { key: String, params: Params },

    // Stack only
    Push { name: String, params: Option<Params> },
    Pop { count: usize },
    PopToTop,
    Replace { name: String, params: Option<Params> },

    // Tabs and drawer
    JumpTo { name: String, params: Option<Params> },

    // Drawer only
    OpenDrawer,
    CloseDrawer,
    ToggleDrawer,
}

impl NavigationAction {
    pub fn navigate(name: impl Into<String>) -> Self {
        NavigationAction::Navigate {
            name: name.into(),
            params: None,
            merge: false,
        }
    }

    pub fn navigate_with(name: impl Into<String>, params: Params) -> Self {
        NavigationAction::Navigate {
            name: name.into(),
            params: Some(params),
            merge: false,
        }
    }

    pub fn jump_to(name: impl Into<String>) -> Self {
        NavigationAction::JumpTo {
            name: name.into(),
            params: None,
        }
    }

    /// The route name this action targets, if it targets one by name.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            NavigationAction::Navigate { name, .. }
            | NavigationAction::Push { name, .. }
            | NavigationAction::Replace { name, .. }
            | NavigationAction::JumpTo { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn changes_focus(&self) -> bool {
        matches!(
            self,
            NavigationAction::Navigate { .. }
                | NavigationAction::Push { .. }
                | NavigationAction::Replace { .. }
                | NavigationAction::JumpTo { .. }
        )
    }
}
