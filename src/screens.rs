//! # App Routes
//!
//! The adoption catalog's own navigator tree:
//!
//! ```text
//! drawer
//! ├── Main ──► stack
//! │            ├── Home ──► tabs
//! │            │            ├── Adoptar     (catalog)
//! │            │            └── MisPerros   (adopted set)
//! │            ├── DogDetails { dog }
//! │            └── HowItWorks
//! └── HowItWorks
//! ```

use std::sync::Arc;

use serde_json::{Value, json};

use crate::core::descriptor::ScreenRegistry;
use crate::core::error::ConfigurationError;
use crate::core::route::{
    NavigatorConfig, RouteDefinition, RouteTable, RouterOptions, ScreenOptions,
};
use crate::core::router::RouterKind;

pub const MAIN: &str = "Main";
pub const HOW_IT_WORKS: &str = "HowItWorks";
pub const HOME: &str = "Home";
pub const DOG_DETAILS: &str = "DogDetails";
pub const ADOPT: &str = "Adoptar";
pub const MY_DOGS: &str = "MisPerros";

const DOG_DETAILS_FALLBACK_TITLE: &str = "Detalles del perro";

fn options(value: Value) -> ScreenOptions {
    match value {
        Value::Object(map) => map,
        _ => ScreenOptions::new(),
    }
}

fn tabs() -> Result<NavigatorConfig, ConfigurationError> {
    let table = RouteTable::new(vec![
        RouteDefinition::new(ADOPT).options(options(json!({ "title": "Adoptar", "icon": "dog" }))),
        RouteDefinition::new(MY_DOGS)
            .options(options(json!({ "title": "Mis Perros", "icon": "heart" }))),
    ])?
    .with_screen_options(options(json!({
        "tabBarActiveTintColor": "#28a745",
        "tabBarInactiveTintColor": "#6c757d",
    })));
    NavigatorConfig::new(RouterKind::Tabs, table, RouterOptions::default())
}

fn stack() -> Result<NavigatorConfig, ConfigurationError> {
    let table = RouteTable::new(vec![
        RouteDefinition::new(HOME)
            .options(options(json!({ "headerShown": false })))
            .child(Arc::new(tabs()?)),
        RouteDefinition::new(DOG_DETAILS).options_fn(|route| {
            let title = route
                .params
                .as_ref()
                .and_then(|p| p.get("dog"))
                .and_then(|dog| dog.get("name"))
                .and_then(Value::as_str)
                .unwrap_or(DOG_DETAILS_FALLBACK_TITLE);
            options(json!({ "title": title }))
        }),
        RouteDefinition::new(HOW_IT_WORKS).options(options(json!({ "title": "Cómo funciona" }))),
    ])?
    .with_screen_options(options(json!({ "headerTintColor": "#28a745" })));
    NavigatorConfig::new(RouterKind::Stack, table, RouterOptions::default())
}

/// The full application tree, rooted at the drawer.
pub fn app_navigator() -> Result<NavigatorConfig, ConfigurationError> {
    let table = RouteTable::new(vec![
        RouteDefinition::new(MAIN)
            .options(options(json!({ "title": "Catálogo de Perros", "icon": "dog" })))
            .child(Arc::new(stack()?)),
        RouteDefinition::new(HOW_IT_WORKS)
            .options(options(json!({ "title": "Cómo funciona", "icon": "help-circle" }))),
    ])?
    .with_screen_options(options(json!({
        "headerShown": false,
        "drawerActiveTintColor": "#28a745",
        "drawerInactiveTintColor": "#212529",
    })));
    NavigatorConfig::new(RouterKind::Drawer, table, RouterOptions::default())
}

/// Text renderers for every app screen, one line each.
pub fn screen_registry() -> ScreenRegistry<String> {
    let mut screens = ScreenRegistry::new();
    screens
        .register(MAIN, |_| "Catálogo de Perros".to_string())
        .register(HOME, |_| "Inicio".to_string())
        .register(ADOPT, |_| "Perros disponibles".to_string())
        .register(MY_DOGS, |_| "Mis perros adoptados".to_string())
        .register(HOW_IT_WORKS, |_| "Cómo funciona la adopción".to_string())
        .register(DOG_DETAILS, |route| {
            let dog = route.params.as_ref().and_then(|p| p.get("dog"));
            let field = |key: &str| {
                dog.and_then(|d| d.get(key))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            };
            match (field("name"), field("breed")) {
                (Some(name), Some(breed)) => format!("{name} es de raza {breed}"),
                (Some(name), None) => name,
                _ => DOG_DETAILS_FALLBACK_TITLE.to_string(),
            }
        });
    screens
}
