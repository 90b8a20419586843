//! # Drawer Policy
//!
//! Tab semantics plus a drawer that can be open or closed. Focusing another
//! route closes the drawer, and `GoBack` closes an open drawer before doing
//! anything else.

use crate::core::action::NavigationAction;
use crate::core::error::ConfigurationError;
use crate::core::route::NavigatorConfig;
use crate::core::router::{Router, RouterKind, tab};
use crate::core::state::{InitialState, NavigationState};

#[derive(Debug, Clone, Copy, Default)]
pub struct DrawerRouter;

impl Router for DrawerRouter {
    fn initial_state(&self, config: &NavigatorConfig) -> NavigationState {
        tab::initial_state(RouterKind::Drawer, config)
    }

    fn rehydrate(
        &self,
        snapshot: &InitialState,
        config: &NavigatorConfig,
    ) -> Result<NavigationState, ConfigurationError> {
        tab::rehydrate(RouterKind::Drawer, snapshot, config)
    }

    fn state_for_action(
        &self,
        state: &NavigationState,
        action: &NavigationAction,
        config: &NavigatorConfig,
    ) -> Option<NavigationState> {
        match action {
            NavigationAction::OpenDrawer => Some(with_drawer(state, true)),
            NavigationAction::CloseDrawer => Some(with_drawer(state, false)),
            NavigationAction::ToggleDrawer => Some(with_drawer(state, !state.drawer_open)),
            NavigationAction::GoBack if state.drawer_open => Some(with_drawer(state, false)),
            _ => {
                let next = tab::TabRouter.state_for_action(state, action, config)?;
                if next.index != state.index {
                    return Some(with_drawer(&next, false));
                }
                Some(next)
            }
        }
    }

    /// An open drawer eats `GoBack` before any nested navigator sees it.
    fn intercepts(&self, state: &NavigationState, action: &NavigationAction) -> bool {
        state.drawer_open && matches!(action, NavigationAction::GoBack)
    }
}

fn with_drawer(state: &NavigationState, open: bool) -> NavigationState {
    let mut next = state.clone();
    next.drawer_open = open;
    next
}
