//! # Tab Policy
//!
//! One entry per route name. Entries are created on first visit, inserted at
//! their route table position, and reused on every later visit so a tab keeps
//! its params (and nested navigator state) across switches.

use crate::core::action::NavigationAction;
use crate::core::error::ConfigurationError;
use crate::core::route::{BackBehavior, NavigatorConfig, Params};
use crate::core::router::{Router, RouterKind, next_params, set_params};
use crate::core::state::{InitialState, NavigationState, RouteEntry, snapshot_entries};

#[derive(Debug, Clone, Copy, Default)]
pub struct TabRouter;

impl Router for TabRouter {
    fn initial_state(&self, config: &NavigatorConfig) -> NavigationState {
        initial_state(RouterKind::Tabs, config)
    }

    fn rehydrate(
        &self,
        snapshot: &InitialState,
        config: &NavigatorConfig,
    ) -> Result<NavigationState, ConfigurationError> {
        rehydrate(RouterKind::Tabs, snapshot, config)
    }

    fn state_for_action(
        &self,
        state: &NavigationState,
        action: &NavigationAction,
        config: &NavigatorConfig,
    ) -> Option<NavigationState> {
        match action {
            NavigationAction::Navigate {
                name,
                params,
                merge,
            } => focus_route(state, config, name, params.as_ref(), *merge),
            NavigationAction::JumpTo { name, params } => {
                focus_route(state, config, name, params.as_ref(), false)
            }
            NavigationAction::GoBack => go_back(state, config),
            NavigationAction::SetParams { key, params } => set_params(state, key, params),
            _ => None,
        }
    }
}

pub(crate) fn initial_state(kind: RouterKind, config: &NavigatorConfig) -> NavigationState {
    let name = config.initial_route_name();
    let routes: Vec<_> = config.table.create_entry(name, None).into_iter().collect();
    let mut state = NavigationState::new(kind, config.table.names(), routes, 0);
    state.history = state.routes.iter().map(|r| r.key.clone()).collect();
    state
}

pub(crate) fn rehydrate(
    kind: RouterKind,
    snapshot: &InitialState,
    config: &NavigatorConfig,
) -> Result<NavigationState, ConfigurationError> {
    let entries = snapshot_entries(snapshot, config)?;
    if entries.is_empty() {
        return Ok(initial_state(kind, config));
    }
    let focused = snapshot.index.unwrap_or(0);
    let Some(focused_name) = entries.get(focused).map(|e| e.name.clone()) else {
        return Err(ConfigurationError::InvalidSnapshot(format!(
            "{} index {} out of bounds for {} routes",
            kind,
            focused,
            entries.len()
        )));
    };

    // Table order, first occurrence of each name wins.
    let mut routes: Vec<RouteEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !routes.iter().any(|r| r.name == entry.name) {
            routes.push(entry);
        }
    }
    routes.sort_by_key(|r| config.table.position(&r.name));

    let index = routes
        .iter()
        .position(|r| r.name == focused_name)
        .unwrap_or_default();
    let mut state = NavigationState::new(kind, config.table.names(), routes, index);
    state.history = vec![state.routes[index].key.clone()];
    Ok(state)
}

/// Focuses `name`, mounting it on first visit.
pub(crate) fn focus_route(
    state: &NavigationState,
    config: &NavigatorConfig,
    name: &str,
    params: Option<&Params>,
    merge: bool,
) -> Option<NavigationState> {
    if !state.allows(name) {
        return None;
    }
    let def = config.table.get(name)?;
    let mut next = state.clone();

    let index = match next.routes.iter().position(|r| r.name == name) {
        Some(position) => {
            let route = &mut next.routes[position];
            route.params = next_params(def, route.params.as_ref(), params, merge);
            position
        }
        None => {
            let entry = config.table.create_entry(name, params)?;
            let target = config.table.position(name);
            let insert_at = next
                .routes
                .iter()
                .take_while(|r| config.table.position(&r.name) < target)
                .count();
            next.routes.insert(insert_at, entry);
            insert_at
        }
    };

    next.index = index;
    let key = next.routes[index].key.clone();
    next.history.retain(|k| *k != key);
    next.history.push(key);
    Some(next)
}

pub(crate) fn go_back(state: &NavigationState, config: &NavigatorConfig) -> Option<NavigationState> {
    let departing = state.focused_route()?.key.clone();
    let target = match config.options.back_behavior {
        BackBehavior::None => return None,
        BackBehavior::History => {
            if state.history.len() < 2 {
                return None;
            }
            let mut next = state.clone();
            next.history.pop();
            let key = next.history.last()?.clone();
            next.index = next.routes.iter().position(|r| r.key == key)?;
            return Some(next);
        }
        BackBehavior::FirstRoute => config.table.definitions().first()?.name.as_str(),
        BackBehavior::InitialRoute => config.initial_route_name(),
    };

    if state.focused_name() == Some(target) {
        return None;
    }
    let mut next = focus_route(state, config, target, None, false)?;
    next.history.retain(|k| *k != departing);
    Some(next)
}
