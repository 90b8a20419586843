//! # Descriptors
//!
//! Maps every mounted route of one navigator to something a host can render.
//! Descriptors are derived on demand from the state and the route table and
//! never stored; a host that wants memoization can key on `RouteEntry::key`.
//!
//! The content type `C` is whatever the host renders (a widget, a string, a
//! test marker). This module never looks inside it.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::core::error::ConfigurationError;
use crate::core::route::{RouteTable, ScreenOptions};
use crate::core::state::{NavigationState, RouteEntry};

pub type ScreenBuilder<C> = Rc<dyn Fn(&RouteEntry) -> C>;

/// Screen builders by route name.
pub struct ScreenRegistry<C> {
    builders: HashMap<String, ScreenBuilder<C>>,
}

impl<C> Default for ScreenRegistry<C> {
    fn default() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }
}

impl<C> ScreenRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, builder: F) -> &mut Self
    where
        F: Fn(&RouteEntry) -> C + 'static,
    {
        self.builders.insert(name.into(), Rc::new(builder));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ScreenBuilder<C>> {
        self.builders.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }
}

/// Render-ready view of one mounted route.
pub struct Descriptor<C> {
    pub route: RouteEntry,
    pub options: ScreenOptions,
    builder: ScreenBuilder<C>,
}

impl<C> Descriptor<C> {
    pub fn render(&self) -> C {
        (self.builder)(&self.route)
    }
}

impl<C> fmt::Debug for Descriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("route", &self.route)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Resolves every route in `state` (one level, not nested navigators).
///
/// Options are the table's `screen_options` overlaid with the route's own.
pub fn resolve_descriptors<C>(
    state: &NavigationState,
    table: &RouteTable,
    screens: &ScreenRegistry<C>,
) -> Result<HashMap<String, Descriptor<C>>, ConfigurationError> {
    state
        .routes
        .iter()
        .map(|route| {
            let def = table
                .get(&route.name)
                .ok_or_else(|| ConfigurationError::UnknownRoute {
                    name: route.name.clone(),
                })?;
            let builder = screens
                .get(&route.name)
                .ok_or_else(|| ConfigurationError::MissingScreen {
                    name: route.name.clone(),
                })?;

            let mut options = table.screen_options.clone();
            options.extend(def.options.for_entry(route));

            let descriptor = Descriptor {
                route: route.clone(),
                options,
                builder: Rc::clone(builder),
            };
            Ok((route.key.clone(), descriptor))
        })
        .collect()
}
