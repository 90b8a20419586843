//! # Route Table
//!
//! Static description of where a navigator can go. Built once, never mutated.
//!
//! ```text
//! NavigatorConfig
//! ├── kind: RouterKind              // stack | tabs | drawer
//! ├── options: RouterOptions        // initial route, back behavior, navigate mode
//! ├── router: Box<dyn Router>       // picked from `kind` at construction
//! └── table: RouteTable
//!     ├── screen_options            // shared by every screen of this navigator
//!     └── definitions: Vec<RouteDefinition>
//!         └── child: Option<Arc<NavigatorConfig>>   // nested navigator
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::error::ConfigurationError;
use crate::core::router::{Router, RouterKind};
use crate::core::state::{NavigationState, RouteEntry};

/// Route parameters. Arbitrary JSON, like everything the host passes through.
pub type Params = Map<String, Value>;

/// Render configuration for a screen (title, header flags, ...).
pub type ScreenOptions = Map<String, Value>;

pub type OptionsFn = Arc<dyn Fn(&RouteEntry) -> ScreenOptions + Send + Sync>;
pub type IdFn = Arc<dyn Fn(Option<&Params>) -> Option<String> + Send + Sync>;

/// Per-route options: fixed, or computed from the mounted entry.
#[derive(Clone)]
pub enum RouteOptions {
    Static(ScreenOptions),
    Computed(OptionsFn),
}

impl RouteOptions {
    pub fn for_entry(&self, entry: &RouteEntry) -> ScreenOptions {
        match self {
            RouteOptions::Static(options) => options.clone(),
            RouteOptions::Computed(f) => f(entry),
        }
    }
}

impl Default for RouteOptions {
    fn default() -> Self {
        RouteOptions::Static(ScreenOptions::new())
    }
}

/// A named destination.
#[derive(Clone)]
pub struct RouteDefinition {
    pub name: String,
    pub options: RouteOptions,
    pub initial_params: Option<Params>,
    get_id: Option<IdFn>,
    child: Option<Arc<NavigatorConfig>>,
}

impl RouteDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: RouteOptions::default(),
            initial_params: None,
            get_id: None,
            child: None,
        }
    }

    pub fn options(mut self, options: ScreenOptions) -> Self {
        self.options = RouteOptions::Static(options);
        self
    }

    pub fn options_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&RouteEntry) -> ScreenOptions + Send + Sync + 'static,
    {
        self.options = RouteOptions::Computed(Arc::new(f));
        self
    }

    pub fn initial_params(mut self, params: Option<Params>) -> Self {
        self.initial_params = params;
        self
    }

    /// Identity function used by stacks to refocus an entry instead of pushing a copy.
    pub fn get_id<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&Params>) -> Option<String> + Send + Sync + 'static,
    {
        self.get_id = Some(Arc::new(f));
        self
    }

    /// Mounts a nested navigator under this route.
    pub fn child(mut self, config: Arc<NavigatorConfig>) -> Self {
        self.child = Some(config);
        self
    }

    pub fn id_for(&self, params: Option<&Params>) -> Option<String> {
        self.get_id.as_ref().and_then(|f| f(params))
    }

    pub fn child_config(&self) -> Option<&Arc<NavigatorConfig>> {
        self.child.as_ref()
    }

    /// `initial_params` overlaid with `params`.
    pub fn params_with_defaults(&self, params: Option<&Params>) -> Option<Params> {
        match (&self.initial_params, params) {
            (None, None) => None,
            (Some(base), None) => Some(base.clone()),
            (None, Some(p)) => Some(p.clone()),
            (Some(base), Some(p)) => {
                let mut merged = base.clone();
                merged.extend(p.iter().map(|(k, v)| (k.clone(), v.clone())));
                Some(merged)
            }
        }
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("name", &self.name)
            .field("initial_params", &self.initial_params)
            .field("has_id", &self.get_id.is_some())
            .field("child", &self.child.as_ref().map(|c| c.kind))
            .finish()
    }
}

/// Ordered, name-unique set of route definitions.
#[derive(Debug, Clone)]
pub struct RouteTable {
    definitions: Vec<RouteDefinition>,
    pub screen_options: ScreenOptions,
}

impl RouteTable {
    pub fn new(definitions: Vec<RouteDefinition>) -> Result<Self, ConfigurationError> {
        if definitions.is_empty() {
            return Err(ConfigurationError::EmptyRouteTable);
        }
        for (i, def) in definitions.iter().enumerate() {
            if definitions[..i].iter().any(|d| d.name == def.name) {
                return Err(ConfigurationError::DuplicateRoute {
                    name: def.name.clone(),
                });
            }
        }
        Ok(Self {
            definitions,
            screen_options: ScreenOptions::new(),
        })
    }

    pub fn with_screen_options(mut self, options: ScreenOptions) -> Self {
        self.screen_options = options;
        self
    }

    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.name.clone()).collect()
    }

    pub fn definitions(&self) -> &[RouteDefinition] {
        &self.definitions
    }

    /// Mints a fresh entry for `name`, seeding the nested navigator if there is one.
    pub fn create_entry(&self, name: &str, params: Option<&Params>) -> Option<RouteEntry> {
        let def = self.get(name)?;
        Some(RouteEntry {
            key: format!("{}-{}", name, Uuid::new_v4().simple()),
            name: name.to_string(),
            params: def.params_with_defaults(params),
            state: def
                .child_config()
                .map(|child| Box::new(child.initial_state())),
        })
    }
}

/// Where `GoBack` leads in tab-like navigators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackBehavior {
    #[default]
    FirstRoute,
    InitialRoute,
    History,
    None,
}

/// How a stack resolves `Navigate` to a name that is already mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigateMode {
    /// Push a new entry unless the focused one already has that name.
    #[default]
    Push,
    /// Pop back to the nearest entry with that name.
    PopToExisting,
}

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub initial_route_name: Option<String>,
    pub back_behavior: BackBehavior,
    pub navigate_mode: NavigateMode,
}

/// One navigator: its policy, routes and options.
pub struct NavigatorConfig {
    pub kind: RouterKind,
    pub table: RouteTable,
    pub options: RouterOptions,
    router: Box<dyn Router>,
}

impl NavigatorConfig {
    pub fn new(
        kind: RouterKind,
        table: RouteTable,
        options: RouterOptions,
    ) -> Result<Self, ConfigurationError> {
        if let Some(name) = &options.initial_route_name
            && !table.contains(name)
        {
            return Err(ConfigurationError::InvalidInitialRoute { name: name.clone() });
        }
        Ok(Self {
            kind,
            table,
            options,
            router: kind.router(),
        })
    }

    pub fn router(&self) -> &dyn Router {
        self.router.as_ref()
    }

    pub fn initial_state(&self) -> NavigationState {
        self.router.initial_state(self)
    }

    /// Explicit initial route, else the first route in the table.
    pub fn initial_route_name(&self) -> &str {
        self.options
            .initial_route_name
            .as_deref()
            .unwrap_or_else(|| self.table.definitions[0].name.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Arc<NavigatorConfig>> {
        self.table.get(name).and_then(|d| d.child_config())
    }

    /// True if this navigator or any nested one declares `name`.
    pub fn knows(&self, name: &str) -> bool {
        self.table.definitions.iter().any(|d| {
            d.name == name || d.child_config().is_some_and(|child| child.knows(name))
        })
    }
}

impl fmt::Debug for NavigatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorConfig")
            .field("kind", &self.kind)
            .field("table", &self.table)
            .field("options", &self.options)
            .finish()
    }
}
