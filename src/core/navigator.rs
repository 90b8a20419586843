//! # Navigator
//!
//! The facade a host mounts: a config, a store seeded from it, and the
//! descriptor resolver bound to the root navigator.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use log::info;

use crate::core::action::NavigationAction;
use crate::core::descriptor::{Descriptor, ScreenRegistry, resolve_descriptors};
use crate::core::error::ConfigurationError;
use crate::core::route::{NavigatorConfig, RouteTable, RouterOptions};
use crate::core::router::RouterKind;
use crate::core::state::{InitialState, NavigationState};
use crate::core::store::{NavigationStore, Subscription};

/// One mounted navigator tree. Dropping it discards the state.
#[derive(Clone)]
pub struct Navigator {
    store: NavigationStore,
}

/// Builds a single-level navigator of `kind` over `table`.
pub fn create_navigator(
    kind: RouterKind,
    table: RouteTable,
    initial_route_name: Option<&str>,
) -> Result<Navigator, ConfigurationError> {
    let options = RouterOptions {
        initial_route_name: initial_route_name.map(String::from),
        ..Default::default()
    };
    let config = NavigatorConfig::new(kind, table, options)?;
    Ok(Navigator::new(Arc::new(config)))
}

impl Navigator {
    pub fn new(config: Arc<NavigatorConfig>) -> Self {
        let initial = config.initial_state();
        info!("Navigator mounted: {} on {}", config.kind, config.initial_route_name());
        Self {
            store: NavigationStore::new(config, initial),
        }
    }

    /// Seeds the whole tree from a nested snapshot.
    pub fn with_initial_state(
        config: Arc<NavigatorConfig>,
        snapshot: &InitialState,
    ) -> Result<Self, ConfigurationError> {
        let initial = config.router().rehydrate(snapshot, &config)?;
        initial
            .check_invariants()
            .map_err(|e| ConfigurationError::InvalidSnapshot(e.to_string()))?;
        info!("Navigator rehydrated: {:?}", initial.focused_path());
        Ok(Self {
            store: NavigationStore::new(config, initial),
        })
    }

    pub fn dispatch(&self, action: NavigationAction) -> Result<(), ConfigurationError> {
        self.store.dispatch(action)
    }

    pub fn state(&self) -> Rc<NavigationState> {
        self.store.state()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&NavigationState) + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn store(&self) -> &NavigationStore {
        &self.store
    }

    pub fn config(&self) -> &Arc<NavigatorConfig> {
        self.store.config()
    }

    /// Descriptors for every route of the root navigator.
    pub fn resolve_descriptors<C>(
        &self,
        screens: &ScreenRegistry<C>,
    ) -> Result<HashMap<String, Descriptor<C>>, ConfigurationError> {
        resolve_descriptors(&self.state(), &self.config().table, screens)
    }
}
