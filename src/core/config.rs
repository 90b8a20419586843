//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.waypost/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Loading and resolution run before the logger exists, so nothing here logs.
//! What happened is returned instead (`ConfigSource`,
//! `ResolvedConfig::rejected_log_level`) and reported once logging is up.

use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::router::RouterKind;
use crate::harness::{DEFAULT_DUMMY_NAME, DEFAULT_SCREEN_NAME};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WaypostConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub harness: HarnessConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

/// Settings for the two-screen test navigator (`--kind`).
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HarnessConfig {
    pub kind: Option<RouterKind>,
    pub screen_name: Option<String>,
    pub dummy_route: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub adopted_path: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "waypost.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
const ADOPTED_FILE_NAME: &str = "adopted.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` drives the app tree; `Some` drives a test navigator of that kind.
    pub harness_kind: Option<RouterKind>,
    pub screen_name: String,
    pub dummy_route: String,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
    pub adopted_path: PathBuf,
    /// A log level that was given but didn't parse; the default was used.
    pub rejected_log_level: Option<String>,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub kind: Option<RouterKind>,
    pub log_level: Option<String>,
    pub adopted_path: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.waypost`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".waypost"))
}

/// Returns the path to `~/.waypost/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Where the loaded settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Generated(PathBuf),
    GenerateFailed { path: PathBuf, reason: String },
    NoHomeDir,
}

impl ConfigSource {
    /// Reports the source. Call after the logger is installed.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Generated(path) => {
                info!("No config file found, generated default at {}", path.display())
            }
            ConfigSource::GenerateFailed { path, reason } => {
                warn!("Failed to write default config to {}: {}", path.display(), reason)
            }
            ConfigSource::NoHomeDir => {
                warn!("Could not determine home directory, using default config")
            }
        }
    }
}

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: WaypostConfig,
    pub source: ConfigSource,
}

/// Load config from `path`, or from `~/.waypost/config.toml` when `None`.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `WaypostConfig::default()`. An explicit path that doesn't exist is
/// an I/O error. A malformed file returns `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) if p.exists() => p,
            Some(p) => {
                let source = match generate_default_config(&p) {
                    Ok(()) => ConfigSource::Generated(p),
                    Err(e) => ConfigSource::GenerateFailed {
                        path: p,
                        reason: e.to_string(),
                    },
                };
                return Ok(LoadedConfig {
                    config: WaypostConfig::default(),
                    source,
                });
            }
            None => {
                return Ok(LoadedConfig {
                    config: WaypostConfig::default(),
                    source: ConfigSource::NoHomeDir,
                });
            }
        },
    };

    let contents = fs::read_to_string(&path)?;
    let config: WaypostConfig = toml::from_str(&contents)?;
    Ok(LoadedConfig {
        config,
        source: ConfigSource::File(path),
    })
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Waypost Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"               # "off", "error", "warn", "info", "debug", "trace"
# log_file = "waypost.log"

# [harness]
# kind = "stack"                    # "stack", "tabs" or "drawer"; omit to drive the app tree
# screen_name = "TestScreen"
# dummy_route = "Dummy"             # Or set WAYPOST_DUMMY_ROUTE env var

# [storage]
# adopted_path = "/home/me/.waypost/adopted.json"   # Or set WAYPOST_ADOPTED_PATH
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &WaypostConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Log level: CLI → env → config → default
    let requested_level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("WAYPOST_LOG_LEVEL").ok())
        .or_else(|| config.general.log_level.clone());
    let (log_level, rejected_log_level) = match requested_level {
        None => (DEFAULT_LOG_LEVEL, None),
        Some(level) => match level.parse::<LevelFilter>() {
            Ok(filter) => (filter, None),
            Err(_) => (DEFAULT_LOG_LEVEL, Some(level)),
        },
    };

    let log_file = config
        .general
        .log_file
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    // Adopted set: CLI → env → config → ~/.waypost/adopted.json
    let adopted_path = cli
        .adopted_path
        .clone()
        .or_else(|| std::env::var("WAYPOST_ADOPTED_PATH").ok().map(PathBuf::from))
        .or_else(|| config.storage.adopted_path.clone().map(PathBuf::from))
        .or_else(|| config_dir().map(|d| d.join(ADOPTED_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(ADOPTED_FILE_NAME));

    // Dummy route: env → config → default
    let dummy_route = std::env::var("WAYPOST_DUMMY_ROUTE")
        .ok()
        .or_else(|| config.harness.dummy_route.clone())
        .unwrap_or_else(|| DEFAULT_DUMMY_NAME.to_string());

    ResolvedConfig {
        harness_kind: cli.kind.or(config.harness.kind),
        screen_name: config
            .harness
            .screen_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SCREEN_NAME.to_string()),
        dummy_route,
        log_level,
        log_file: PathBuf::from(log_file),
        adopted_path,
        rejected_log_level,
    }
}
