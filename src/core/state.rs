//! # Navigation State
//!
//! The state tree of one mounted navigator, plus the snapshot format used to
//! seed it.
//!
//! ```text
//! NavigationState
//! ├── key: String                    // "<kind>-<uuid>"
//! ├── kind: RouterKind
//! ├── index: usize                   // focused entry
//! ├── routes: Vec<RouteEntry>
//! │   └── state: Option<Box<NavigationState>>   // nested navigator
//! ├── route_names: Vec<String>       // everything the table allows here
//! ├── history: Vec<String>           // tabs/drawer: visited keys, focused last
//! └── drawer_open: bool              // drawer only
//! ```
//!
//! States are values. Policies build new ones from old ones; the store hands
//! them out behind `Rc` and never touches a committed state again.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::error::ConfigurationError;
use crate::core::route::{NavigatorConfig, Params};
use crate::core::router::RouterKind;

/// A mounted route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEntry {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Box<NavigationState>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationState {
    pub key: String,
    pub kind: RouterKind,
    pub index: usize,
    pub routes: Vec<RouteEntry>,
    pub route_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub drawer_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("state {key}: {reason}")]
pub struct InvariantViolation {
    pub key: String,
    pub reason: String,
}

impl NavigationState {
    /// A state with a fresh key and nothing but `routes` focused at `index`.
    pub fn new(kind: RouterKind, route_names: Vec<String>, routes: Vec<RouteEntry>, index: usize) -> Self {
        Self {
            key: format!("{}-{}", kind, Uuid::new_v4().simple()),
            kind,
            index,
            routes,
            route_names,
            history: Vec::new(),
            drawer_open: false,
        }
    }

    pub fn focused_route(&self) -> Option<&RouteEntry> {
        self.routes.get(self.index)
    }

    pub fn focused_name(&self) -> Option<&str> {
        self.focused_route().map(|r| r.name.as_str())
    }

    pub fn route_by_key(&self, key: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|r| r.key == key)
    }

    pub fn allows(&self, name: &str) -> bool {
        self.route_names.iter().any(|n| n == name)
    }

    /// Follows focused entries down to the innermost navigator.
    pub fn focused_leaf(&self) -> &NavigationState {
        let mut current = self;
        while let Some(child) = current.focused_route().and_then(|r| r.state.as_deref()) {
            current = child;
        }
        current
    }

    /// Names of the focused entry at every level, outermost first.
    pub fn focused_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(state) = current {
            let Some(route) = state.focused_route() else { break };
            path.push(route.name.as_str());
            current = route.state.as_deref();
        }
        path
    }

    /// Checks the structural invariants, recursing into nested navigators.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let violation = |reason: String| InvariantViolation {
            key: self.key.clone(),
            reason,
        };

        if self.routes.is_empty() {
            return Err(violation("no routes mounted".into()));
        }
        if self.index >= self.routes.len() {
            return Err(violation(format!(
                "index {} out of bounds for {} routes",
                self.index,
                self.routes.len()
            )));
        }
        for (i, route) in self.routes.iter().enumerate() {
            if !self.allows(&route.name) {
                return Err(violation(format!("route {} not in route names", route.name)));
            }
            if self.routes[..i].iter().any(|r| r.key == route.key) {
                return Err(violation(format!("duplicate route key {}", route.key)));
            }
        }
        if matches!(self.kind, RouterKind::Tabs | RouterKind::Drawer) {
            if self.history.iter().any(|k| self.route_by_key(k).is_none()) {
                return Err(violation("history references an unmounted route".into()));
            }
            if self.history.last() != Some(&self.routes[self.index].key) {
                return Err(violation("history does not end at the focused route".into()));
            }
        }
        for route in &self.routes {
            if let Some(child) = &route.state {
                child.check_invariants()?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Initial-state snapshot
// ============================================================================

/// Literal seed for a navigator tree, one level per navigator.
///
/// ```json
/// { "index": 1, "routes": [ { "name": "Home" }, { "name": "Details", "params": { "id": 1 } } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub routes: Vec<InitialRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialRoute {
    pub name: String,
    #[serde(default)]
    pub params: Option<Params>,
    #[serde(default)]
    pub state: Option<InitialState>,
}

impl InitialState {
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }
}

/// Turns snapshot routes into mounted entries for `config`, recursing into
/// nested navigators. Routers decide ordering and focus on top of this.
pub fn snapshot_entries(
    snapshot: &InitialState,
    config: &NavigatorConfig,
) -> Result<Vec<RouteEntry>, ConfigurationError> {
    snapshot
        .routes
        .iter()
        .map(|route| {
            let def = config
                .table
                .get(&route.name)
                .ok_or_else(|| ConfigurationError::UnknownRoute {
                    name: route.name.clone(),
                })?;
            let state = match (def.child_config(), &route.state) {
                (Some(child), Some(nested)) => Some(Box::new(child.router().rehydrate(nested, child)?)),
                (Some(child), None) => Some(Box::new(child.initial_state())),
                (None, Some(_)) => {
                    return Err(ConfigurationError::InvalidSnapshot(format!(
                        "route {} has no nested navigator",
                        route.name
                    )));
                }
                (None, None) => None,
            };
            Ok(RouteEntry {
                key: format!("{}-{}", route.name, Uuid::new_v4().simple()),
                name: route.name.clone(),
                params: def.params_with_defaults(route.params.as_ref()),
                state,
            })
        })
        .collect()
}
