//! # Focus Synchronizer
//!
//! Lets a host declare which route of a navigator should be visible, instead
//! of issuing navigation calls itself. The host calls `reconcile()` on every
//! render with the current `FocusIntent`; the synchronizer compares it with
//! the store and dispatches at most one corrective `Navigate`.
//!
//! ```text
//! is_focused  active == desired   active == dummy   action
//! ──────────  ─────────────────   ───────────────   ─────────────────
//! true        no                  -                 Navigate(desired)
//! false       -                   no                Navigate(dummy)
//! otherwise                                         none
//! ```
//!
//! Level-triggered: re-evaluating with the same intent against an unchanged
//! store does nothing, so rendering twice never dispatches twice.

use log::debug;

use crate::core::action::NavigationAction;
use crate::core::error::ConfigurationError;
use crate::core::store::NavigationStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusIntent {
    pub desired_route_name: String,
    pub is_focused: bool,
}

impl FocusIntent {
    pub fn new(desired_route_name: impl Into<String>, is_focused: bool) -> Self {
        Self {
            desired_route_name: desired_route_name.into(),
            is_focused,
        }
    }
}

#[derive(Debug)]
pub struct FocusSync {
    dummy_route_name: String,
    /// Intent and store version at the last evaluation.
    settled: Option<(FocusIntent, u64)>,
}

impl FocusSync {
    pub fn new(dummy_route_name: impl Into<String>) -> Self {
        Self {
            dummy_route_name: dummy_route_name.into(),
            settled: None,
        }
    }

    pub fn dummy_route_name(&self) -> &str {
        &self.dummy_route_name
    }

    /// Brings the store's active route in line with `intent`.
    ///
    /// Returns the action it dispatched, if any. Errors from the dispatch are
    /// passed through untouched.
    pub fn reconcile(
        &mut self,
        store: &NavigationStore,
        intent: &FocusIntent,
    ) -> Result<Option<NavigationAction>, ConfigurationError> {
        if let Some((last, version)) = &self.settled
            && last == intent
            && *version == store.version()
        {
            return Ok(None);
        }

        let state = store.state();
        let target = if intent.is_focused {
            intent.desired_route_name.as_str()
        } else {
            self.dummy_route_name.as_str()
        };

        let action = if state.focused_name() == Some(target) {
            None
        } else {
            debug!(
                "Focus sync: {:?} active, want {} (focused: {})",
                state.focused_name(),
                target,
                intent.is_focused
            );
            let action = NavigationAction::navigate(target);
            store.dispatch(action.clone())?;
            Some(action)
        };

        self.settled = Some((intent.clone(), store.version()));
        Ok(action)
    }
}
