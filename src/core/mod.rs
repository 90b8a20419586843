//! # Core Routing Logic
//!
//! The view router. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • RouteTable (config)  │
//!                    │  • Router (policies)    │
//!                    │  • NavigationStore      │
//!                    │  • Descriptors          │
//!                    │  • FocusSync            │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   Shell    │      │    Test    │      │  Renderer  │
//!     │  (stdin)   │      │ Navigator  │      │  (future)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`route`]: route definitions, tables, navigator configs
//! - [`state`]: `NavigationState` and the initial-state snapshot
//! - [`action`]: the `NavigationAction` enum
//! - [`router`]: stack, tab and drawer policies
//! - [`store`]: dispatch, subscribe, ordering
//! - [`descriptor`]: render descriptors per mounted route
//! - [`focus`]: declarative focus reconciliation
//! - [`navigator`]: the mounted facade
//! - [`config`]: app settings (file, env, CLI)

pub mod action;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod focus;
pub mod navigator;
pub mod route;
pub mod router;
pub mod state;
pub mod store;

pub use action::NavigationAction;
pub use error::ConfigurationError;
pub use navigator::{Navigator, create_navigator};
pub use router::RouterKind;
pub use state::{InitialState, NavigationState, RouteEntry};
