//! # Stack Policy
//!
//! History as a stack of entries. `Navigate` spawns a new entry unless the
//! target is already focused, matches an existing entry by `get_id`, or the
//! navigator runs in `NavigateMode::PopToExisting`. A mounted stack never goes
//! empty: popping the last entry is left unhandled.

use log::debug;

use crate::core::action::NavigationAction;
use crate::core::error::ConfigurationError;
use crate::core::route::{NavigateMode, NavigatorConfig, Params};
use crate::core::router::{Router, RouterKind, next_params, set_params};
use crate::core::state::{InitialState, NavigationState, snapshot_entries};

#[derive(Debug, Clone, Copy, Default)]
pub struct StackRouter;

impl Router for StackRouter {
    fn initial_state(&self, config: &NavigatorConfig) -> NavigationState {
        let name = config.initial_route_name();
        let routes = config.table.create_entry(name, None).into_iter().collect();
        NavigationState::new(RouterKind::Stack, config.table.names(), routes, 0)
    }

    fn rehydrate(
        &self,
        snapshot: &InitialState,
        config: &NavigatorConfig,
    ) -> Result<NavigationState, ConfigurationError> {
        let routes = snapshot_entries(snapshot, config)?;
        if routes.is_empty() {
            return Ok(self.initial_state(config));
        }
        let index = snapshot.index.unwrap_or(routes.len() - 1);
        if index >= routes.len() {
            return Err(ConfigurationError::InvalidSnapshot(format!(
                "stack index {} out of bounds for {} routes",
                index,
                routes.len()
            )));
        }
        // Entries above the focused one would be unreachable.
        let routes = routes.into_iter().take(index + 1).collect();
        Ok(NavigationState::new(RouterKind::Stack, config.table.names(), routes, index))
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
            } => navigate(state, config, name, params.as_ref(), *merge, false),
            NavigationAction::Push { name, params } => {
                navigate(state, config, name, params.as_ref(), false, true)
            }
            NavigationAction::GoBack => pop(state, 1),
            NavigationAction::Pop { count } => pop(state, (*count).max(1)),
            NavigationAction::PopToTop => pop(state, state.routes.len().saturating_sub(1)),
            NavigationAction::Replace { name, params } => {
                if !state.allows(name) {
                    return None;
                }
                let entry = config.table.create_entry(name, params.as_ref())?;
                let mut next = state.clone();
                next.routes.truncate(state.index + 1);
                next.routes[state.index] = entry;
                Some(next)
            }
            NavigationAction::SetParams { key, params } => set_params(state, key, params),
            NavigationAction::JumpTo { .. }
            | NavigationAction::OpenDrawer
            | NavigationAction::CloseDrawer
            | NavigationAction::ToggleDrawer => None,
        }
    }
}

/// Removes up to `count` entries from the top, never the last one.
fn pop(state: &NavigationState, count: usize) -> Option<NavigationState> {
    if state.index == 0 || count == 0 {
        return None;
    }
    let keep = (state.index + 1).saturating_sub(count).max(1);
    let mut next = state.clone();
    next.routes.truncate(keep);
    next.index = keep - 1;
    Some(next)
}

fn navigate(
    state: &NavigationState,
    config: &NavigatorConfig,
    name: &str,
    params: Option<&Params>,
    merge: bool,
    always_push: bool,
) -> Option<NavigationState> {
    if !state.allows(name) {
        return None;
    }
    let def = config.table.get(name)?;
    let visible = &state.routes[..=state.index];

    let existing = match def.id_for(params) {
        Some(id) => visible
            .iter()
            .rposition(|r| r.name == name && def.id_for(r.params.as_ref()).as_deref() == Some(id.as_str())),
        None if always_push => None,
        None if visible[state.index].name == name => Some(state.index),
        None if config.options.navigate_mode == NavigateMode::PopToExisting => {
            visible.iter().rposition(|r| r.name == name)
        }
        None => None,
    };

    let mut next = state.clone();
    match existing {
        Some(position) => {
            debug!("Stack refocusing {} at {}", name, position);
            next.routes.truncate(position + 1);
            let route = &mut next.routes[position];
            route.params = next_params(def, route.params.as_ref(), params, merge);
            next.index = position;
        }
        None => {
            let entry = config.table.create_entry(name, params)?;
            next.routes.truncate(state.index + 1);
            next.routes.push(entry);
            next.index = next.routes.len() - 1;
        }
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::route::{RouteDefinition, RouteTable, RouterOptions};
    use serde_json::json;

    fn config(mode: NavigateMode) -> NavigatorConfig {
        let table = RouteTable::new(vec![
            RouteDefinition::new("Home"),
            RouteDefinition::new("Details"),
            RouteDefinition::new("Profile").get_id(|p| {
                p.and_then(|p| p.get("user")).map(|u| u.to_string())
            }),
        ])
        .unwrap();
        NavigatorConfig::new(
            RouterKind::Stack,
            table,
            RouterOptions {
                navigate_mode: mode,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn params(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    fn names(state: &NavigationState) -> Vec<&str> {
        state.routes.iter().map(|r| r.name.as_str()).collect()
    }

    fn apply(state: &NavigationState, action: NavigationAction, config: &NavigatorConfig) -> NavigationState {
        StackRouter
            .state_for_action(state, &action, config)
            .expect("action should be handled")
    }

    #[test]
    fn test_push_then_go_back() {
        let config = config(NavigateMode::Push);
        let initial = StackRouter.initial_state(&config);
        assert_eq!(names(&initial), vec!["Home"]);

        let pushed = apply(
            &initial,
            NavigationAction::navigate_with("Details", params(json!({"id": 1}))),
            &config,
        );
        assert_eq!(pushed.index, 1);
        assert_eq!(names(&pushed), vec!["Home", "Details"]);
        assert_eq!(pushed.routes[1].params.as_ref().unwrap()["id"], json!(1));
        assert_eq!(pushed.routes[0], initial.routes[0]);

        let back = apply(&pushed, NavigationAction::GoBack, &config);
        assert_eq!(back.index, 0);
        assert_eq!(back.routes, initial.routes);
    }

    #[test]
    fn test_go_back_on_single_entry_is_unhandled() {
        let config = config(NavigateMode::Push);
        let initial = StackRouter.initial_state(&config);
        assert!(StackRouter.state_for_action(&initial, &NavigationAction::GoBack, &config).is_none());
    }

    #[test]
    fn test_navigate_to_focused_route_is_noop() {
        let config = config(NavigateMode::Push);
        let initial = StackRouter.initial_state(&config);
        let next = apply(&initial, NavigationAction::navigate("Home"), &config);
        assert_eq!(next, initial);
    }

    #[test]
    fn test_push_mode_spawns_duplicates() {
        let config = config(NavigateMode::Push);
        let mut state = StackRouter.initial_state(&config);
        state = apply(&state, NavigationAction::navigate("Details"), &config);
        state = apply(&state, NavigationAction::navigate("Home"), &config);
        assert_eq!(names(&state), vec!["Home", "Details", "Home"]);
    }

    #[test]
    fn test_pop_to_existing_mode_refocuses() {
        let config = config(NavigateMode::PopToExisting);
        let mut state = StackRouter.initial_state(&config);
        let home_key = state.routes[0].key.clone();
        state = apply(&state, NavigationAction::navigate("Details"), &config);
        state = apply(&state, NavigationAction::navigate("Home"), &config);
        assert_eq!(names(&state), vec!["Home"]);
        assert_eq!(state.routes[0].key, home_key);
    }

    #[test]
    fn test_get_id_refocuses_matching_entry() {
        let config = config(NavigateMode::Push);
        let mut state = StackRouter.initial_state(&config);
        state = apply(&state, NavigationAction::navigate_with("Profile", params(json!({"user": "a"}))), &config);
        state = apply(&state, NavigationAction::navigate("Details"), &config);
        state = apply(&state, NavigationAction::navigate_with("Profile", params(json!({"user": "b"}))), &config);
        assert_eq!(names(&state), vec!["Home", "Profile", "Details", "Profile"]);

        state = apply(&state, NavigationAction::navigate_with("Profile", params(json!({"user": "a"}))), &config);
        assert_eq!(names(&state), vec!["Home", "Profile"]);
        assert_eq!(state.index, 1);
    }

    #[test]
    fn test_push_ignores_focused_name() {
        let config = config(NavigateMode::Push);
        let initial = StackRouter.initial_state(&config);
        let state = apply(
            &initial,
            NavigationAction::Push {
                name: "Home".into(),
                params: None,
            },
            &config,
        );
        assert_eq!(names(&state), vec!["Home", "Home"]);
    }

    #[test]
    fn test_pop_count_and_pop_to_top() {
        let config = config(NavigateMode::Push);
        let mut state = StackRouter.initial_state(&config);
        for _ in 0..3 {
            state = apply(
                &state,
                NavigationAction::Push {
                    name: "Details".into(),
                    params: None,
                },
                &config,
            );
        }
        let popped = apply(&state, NavigationAction::Pop { count: 2 }, &config);
        assert_eq!(popped.routes.len(), 2);

        let overshoot = apply(&state, NavigationAction::Pop { count: 10 }, &config);
        assert_eq!(names(&overshoot), vec!["Home"]);

        let top = apply(&state, NavigationAction::PopToTop, &config);
        assert_eq!(names(&top), vec!["Home"]);
        assert!(StackRouter.state_for_action(&top, &NavigationAction::PopToTop, &config).is_none());
    }

    #[test]
    fn test_replace_swaps_focused_entry() {
        let config = config(NavigateMode::Push);
        let mut state = StackRouter.initial_state(&config);
        state = apply(&state, NavigationAction::navigate("Details"), &config);
        let replaced = apply(
            &state,
            NavigationAction::Replace {
                name: "Home".into(),
                params: None,
            },
            &config,
        );
        assert_eq!(names(&replaced), vec!["Home", "Home"]);
        assert_ne!(replaced.routes[1].key, state.routes[1].key);
    }

    #[test]
    fn test_unknown_name_and_tab_actions_unhandled() {
        let config = config(NavigateMode::Push);
        let initial = StackRouter.initial_state(&config);
        assert!(StackRouter.state_for_action(&initial, &NavigationAction::navigate("Nope"), &config).is_none());
        assert!(StackRouter.state_for_action(&initial, &NavigationAction::jump_to("Details"), &config).is_none());
        assert!(StackRouter.state_for_action(&initial, &NavigationAction::OpenDrawer, &config).is_none());
    }

    #[test]
    fn test_set_params_merges() {
        let config = config(NavigateMode::Push);
        let initial = StackRouter.initial_state(&config);
        let key = initial.routes[0].key.clone();
        let next = apply(
            &initial,
            NavigationAction::SetParams {
                key,
                params: params(json!({"filter": "lab"})),
            },
            &config,
        );
        assert_eq!(next.routes[0].params.as_ref().unwrap()["filter"], json!("lab"));
    }

    #[test]
    fn test_rehydrate_defaults_index_to_top() {
        let config = config(NavigateMode::Push);
        let snapshot = InitialState::from_json(
            r#"{"routes":[{"name":"Home"},{"name":"Details","params":{"id":1}}]}"#,
        )
        .unwrap();
        let state = StackRouter.rehydrate(&snapshot, &config).unwrap();
        assert_eq!(state.index, 1);
        assert!(state.check_invariants().is_ok());

        let bad = InitialState::from_json(r#"{"index":5,"routes":[{"name":"Home"}]}"#).unwrap();
        assert!(matches!(
            StackRouter.rehydrate(&bad, &config),
            Err(ConfigurationError::InvalidSnapshot(_))
        ));

        let unknown = InitialState::from_json(r#"{"routes":[{"name":"Ghost"}]}"#).unwrap();
        assert_eq!(
            StackRouter.rehydrate(&unknown, &config).unwrap_err(),
            ConfigurationError::UnknownRoute { name: "Ghost".into() }
        );
    }
}
