//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::Path;

use log::LevelFilter;

use crate::core::config::ResolvedConfig;
use crate::core::route::{NavigatorConfig, RouteDefinition, RouteTable, RouterOptions};
use crate::core::router::RouterKind;
use crate::harness::{DEFAULT_DUMMY_NAME, DEFAULT_SCREEN_NAME};

/// A flat navigator over `names`, starting on the first one.
pub fn simple_config(kind: RouterKind, names: &[&str]) -> NavigatorConfig {
    let table = RouteTable::new(names.iter().map(|n| RouteDefinition::new(*n)).collect())
        .expect("test route table");
    NavigatorConfig::new(kind, table, RouterOptions::default()).expect("test navigator config")
}

/// The application tree: drawer → stack → tabs.
pub fn app_config() -> NavigatorConfig {
    crate::screens::app_navigator().expect("app navigator config")
}

/// Resolved settings that keep every file inside `dir`.
pub fn resolved_config(kind: Option<RouterKind>, dir: &Path) -> ResolvedConfig {
    ResolvedConfig {
        harness_kind: kind,
        screen_name: DEFAULT_SCREEN_NAME.to_string(),
        dummy_route: DEFAULT_DUMMY_NAME.to_string(),
        log_level: LevelFilter::Off,
        log_file: dir.join("waypost.log"),
        adopted_path: dir.join("adopted.json"),
        rejected_log_level: None,
    }
}
