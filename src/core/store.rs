//! # Navigation State Store
//!
//! Owns the state tree of one navigator mount. The only way in is
//! `dispatch()`; the only ways out are `state()` and `subscribe()`.
//!
//! ```text
//! dispatch(action)
//!   │ validate names against the whole navigator tree (fails synchronously)
//!   ▼
//! queue ──► offer to the focused leaf navigator
//!             │ None → offer to its parent … up to the root
//!             ▼
//!           commit new Rc<NavigationState>, bump version
//!             ▼
//!           notify listeners in subscription order
//! ```
//!
//! A dispatch issued while another is being processed (typically from a
//! listener) is queued and runs after the current one, so actions are applied
//! in exactly the order they were dispatched.
//!
//! Every candidate state is checked against the structural invariants before
//! it is committed, in release builds too. A state that fails is dropped with
//! a warning and the previous state stays current.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use log::{Level, debug, log, warn};

use crate::core::action::NavigationAction;
use crate::core::error::{ConfigurationError, UnhandledActionWarning};
use crate::core::route::NavigatorConfig;
use crate::core::state::NavigationState;

type Listener = Rc<dyn Fn(&NavigationState)>;

struct StoreInner {
    config: Arc<NavigatorConfig>,
    state: RefCell<Rc<NavigationState>>,
    version: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener_id: Cell<u64>,
    queue: RefCell<VecDeque<NavigationAction>>,
    dispatching: Cell<bool>,
}

/// Cheap, cloneable handle. All clones share one state tree.
#[derive(Clone)]
pub struct NavigationStore {
    inner: Rc<StoreInner>,
}

/// Returned by `subscribe`. Dropping it does not unsubscribe.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Clears the dispatching flag even if a listener panics.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl NavigationStore {
    pub fn new(config: Arc<NavigatorConfig>, initial: NavigationState) -> Self {
        debug!(
            "Mounting {} navigator {} on {:?}",
            config.kind,
            initial.key,
            initial.focused_path()
        );
        Self {
            inner: Rc::new(StoreInner {
                config,
                state: RefCell::new(Rc::new(initial)),
                version: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }),
        }
    }

    pub fn config(&self) -> &Arc<NavigatorConfig> {
        &self.inner.config
    }

    /// The latest committed state.
    pub fn state(&self) -> Rc<NavigationState> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Number of commits so far. Unchanged by no-op and unhandled actions.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&NavigationState) + 'static,
    {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        Subscription {
            id,
            store: Rc::downgrade(&self.inner),
        }
    }

    /// Applies `action`, or queues it if a dispatch is already running.
    ///
    /// Returns `ConfigurationError::UnknownRoute` without touching state when
    /// the action names a route no navigator in the tree declares.
    pub fn dispatch(&self, action: NavigationAction) -> Result<(), ConfigurationError> {
        if let Some(name) = action.target_name()
            && !self.inner.config.knows(name)
        {
            return Err(ConfigurationError::UnknownRoute {
                name: name.to_string(),
            });
        }

        self.inner.queue.borrow_mut().push_back(action);
        if self.inner.dispatching.replace(true) {
            debug!("Dispatch in progress, action queued");
            return Ok(());
        }
        let _guard = DispatchGuard(&self.inner.dispatching);

        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(action) = next else { break };
            self.process(action);
        }
        Ok(())
    }

    fn process(&self, action: NavigationAction) {
        let current = self.state();
        match route_action(&self.inner.config, &current, &action) {
            None => log!(unhandled_level(&action), "{}", UnhandledActionWarning { action }),
            Some(next) if next == *current => debug!("{:?} left state unchanged", action),
            Some(next) => self.commit(&action, next),
        }
    }

    fn commit(&self, action: &NavigationAction, next: NavigationState) {
        if let Err(violation) = next.check_invariants() {
            warn!("Dropping result of {:?}: {}", action, violation);
            return;
        }
        let next = Rc::new(next);
        *self.inner.state.borrow_mut() = Rc::clone(&next);
        self.inner.version.set(self.inner.version.get() + 1);
        debug!(
            "{:?} committed v{}: {:?}",
            action,
            self.inner.version.get(),
            next.focused_path()
        );

        // Snapshot so listeners may (un)subscribe while being notified.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&next);
        }
    }
}

/// Back with nowhere to go is ordinary underflow, not worth a warning.
fn unhandled_level(action: &NavigationAction) -> Level {
    match action {
        NavigationAction::GoBack => Level::Debug,
        _ => Level::Warn,
    }
}

/// Offers `action` to the deepest focused navigator first, bubbling up.
pub fn route_action(
    config: &NavigatorConfig,
    state: &NavigationState,
    action: &NavigationAction,
) -> Option<NavigationState> {
    if !config.router().intercepts(state, action)
        && let Some(focused) = state.focused_route()
        && let (Some(child_state), Some(child_config)) =
            (focused.state.as_deref(), config.child(&focused.name))
        && let Some(child_next) = route_action(child_config, child_state, action)
    {
        let mut next = state.clone();
        next.routes[state.index].state = Some(Box::new(child_next));
        return Some(next);
    }
    config.router().state_for_action(state, action, config)
}
