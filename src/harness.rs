//! # Test Navigator
//!
//! A two-screen navigator for hosting a single screen under test: the screen
//! itself and a background "dummy" screen. Every screen is rendered at once;
//! which one counts as visible is driven purely by `FocusIntent`, so a test can
//! flip `focused` and watch the screen gain or lose focus.
//!
//! Both routes carry a constant `get_id`, so stacks refocus them instead of
//! piling up copies.

use std::sync::Arc;

use log::debug;

use crate::core::action::NavigationAction;
use crate::core::descriptor::ScreenRegistry;
use crate::core::error::ConfigurationError;
use crate::core::focus::{FocusIntent, FocusSync};
use crate::core::navigator::Navigator;
use crate::core::route::{NavigatorConfig, Params, RouteDefinition, RouteTable, RouterOptions};
use crate::core::router::RouterKind;
use crate::core::state::RouteEntry;

pub const DEFAULT_SCREEN_NAME: &str = "TestScreen";
pub const DEFAULT_DUMMY_NAME: &str = "Dummy";

#[derive(Debug, Clone)]
pub struct TestNavigatorOptions {
    pub kind: RouterKind,
    pub name: String,
    pub focused: bool,
    pub screen_params: Option<Params>,
    pub dummy_name: String,
}

impl Default for TestNavigatorOptions {
    fn default() -> Self {
        Self {
            kind: RouterKind::Stack,
            name: DEFAULT_SCREEN_NAME.to_string(),
            focused: true,
            screen_params: None,
            dummy_name: DEFAULT_DUMMY_NAME.to_string(),
        }
    }
}

pub struct TestNavigator<C> {
    navigator: Navigator,
    screens: ScreenRegistry<C>,
    focus: FocusSync,
    intent: FocusIntent,
}

impl<C> TestNavigator<C> {
    /// Mounts the navigator and runs the first focus reconciliation.
    pub fn mount<S, D>(
        options: TestNavigatorOptions,
        screen: S,
        dummy: D,
    ) -> Result<Self, ConfigurationError>
    where
        S: Fn(&RouteEntry) -> C + 'static,
        D: Fn(&RouteEntry) -> C + 'static,
    {
        let screen_id = options.name.clone();
        let dummy_id = options.dummy_name.clone();
        let table = RouteTable::new(vec![
            RouteDefinition::new(options.name.as_str())
                .initial_params(options.screen_params.clone())
                .get_id(move |_| Some(screen_id.clone())),
            RouteDefinition::new(options.dummy_name.as_str())
                .get_id(move |_| Some(dummy_id.clone())),
        ])?;

        let initial = if options.focused {
            &options.name
        } else {
            &options.dummy_name
        };
        let config = NavigatorConfig::new(
            options.kind,
            table,
            RouterOptions {
                initial_route_name: Some(initial.clone()),
                ..Default::default()
            },
        )?;

        let mut screens = ScreenRegistry::new();
        screens
            .register(options.name.as_str(), screen)
            .register(options.dummy_name.as_str(), dummy);

        let mut harness = Self {
            navigator: Navigator::new(Arc::new(config)),
            screens,
            focus: FocusSync::new(options.dummy_name.as_str()),
            intent: FocusIntent::new(options.name, options.focused),
        };
        harness.rerender()?;
        Ok(harness)
    }

    /// Host re-render with a new focus flag.
    pub fn set_focused(&mut self, focused: bool) -> Result<Option<NavigationAction>, ConfigurationError> {
        self.intent.is_focused = focused;
        self.rerender()
    }

    /// Host re-render with the current intent.
    pub fn rerender(&mut self) -> Result<Option<NavigationAction>, ConfigurationError> {
        let action = self.focus.reconcile(self.navigator.store(), &self.intent)?;
        if let Some(action) = &action {
            debug!("Test navigator corrected focus with {:?}", action);
        }
        Ok(action)
    }

    /// Renders every mounted route, in state order.
    pub fn render(&self) -> Result<Vec<C>, ConfigurationError> {
        let state = self.navigator.state();
        let descriptors = self.navigator.resolve_descriptors(&self.screens)?;
        Ok(state
            .routes
            .iter()
            .filter_map(|route| descriptors.get(&route.key).map(|d| d.render()))
            .collect())
    }

    pub fn is_focused(&self) -> bool {
        self.navigator.state().focused_name() == Some(self.intent.desired_route_name.as_str())
    }

    pub fn intent(&self) -> &FocusIntent {
        &self.intent
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mount(kind: RouterKind, focused: bool) -> TestNavigator<String> {
        let options = TestNavigatorOptions {
            kind,
            focused,
            ..Default::default()
        };
        TestNavigator::mount(options, |route| format!("screen:{}", route.name), |_| "dummy".to_string())
            .unwrap()
    }

    #[test]
    fn test_mounts_focused_on_screen() {
        for kind in [RouterKind::Stack, RouterKind::Tabs, RouterKind::Drawer] {
            let nav = mount(kind, true);
            assert!(nav.is_focused(), "{kind}");
            assert_eq!(nav.navigator().store().version(), 0, "{kind}");
        }
    }

    #[test]
    fn test_mounts_on_dummy_when_unfocused() {
        let nav = mount(RouterKind::Stack, false);
        assert!(!nav.is_focused());
        assert_eq!(nav.navigator().state().focused_name(), Some(DEFAULT_DUMMY_NAME));
        assert_eq!(nav.render().unwrap(), vec!["dummy".to_string()]);
    }

    #[test]
    fn test_focus_round_trip_on_stack_does_not_grow() {
        let mut nav = mount(RouterKind::Stack, true);
        for _ in 0..3 {
            assert!(nav.set_focused(false).unwrap().is_some());
            assert!(nav.set_focused(true).unwrap().is_some());
        }
        let state = nav.navigator().state();
        assert!(state.routes.len() <= 2);
        assert!(nav.is_focused());
    }

    #[test]
    fn test_rerender_is_idempotent() {
        let mut nav = mount(RouterKind::Tabs, true);
        nav.set_focused(false).unwrap();
        let version = nav.navigator().store().version();
        assert!(nav.rerender().unwrap().is_none());
        assert!(nav.rerender().unwrap().is_none());
        assert_eq!(nav.navigator().store().version(), version);
    }

    #[test]
    fn test_renders_all_mounted_screens() {
        let mut nav = mount(RouterKind::Tabs, true);
        nav.set_focused(false).unwrap();
        assert_eq!(
            nav.render().unwrap(),
            vec!["screen:TestScreen".to_string(), "dummy".to_string()]
        );
    }

    #[test]
    fn test_screen_params_reach_the_route() {
        let options = TestNavigatorOptions {
            screen_params: json!({"dog": {"name": "Max"}}).as_object().cloned(),
            ..Default::default()
        };
        let nav = TestNavigator::mount(
            options,
            |route| route.params.clone().unwrap_or_default()["dog"]["name"].to_string(),
            |_| String::new(),
        )
        .unwrap();
        assert_eq!(nav.render().unwrap(), vec!["\"Max\"".to_string()]);
    }
}
