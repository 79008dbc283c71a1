//! Process-wide bookkeeping of active dialog identifiers.
//!
//! The registry tracks which identifiers are currently shown and which were
//! asked to dismiss before their host existed. Both sides of the show/dismiss
//! race go through a single critical section, so the two requests converge to
//! "not shown" no matter which order they arrive in.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use log::debug;
use once_cell::sync::Lazy;

/// Where a dismiss request should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissRoute {
    /// A host is currently shown; signal it over the dismiss channel.
    SignalLive,
    /// No host yet; the request was noted for the upcoming show to consume.
    Noted,
}

/// Injectable identifier bookkeeping service.
///
/// The process-wide instance from [`shared_registry`] is the default; tests
/// inject a fresh [`SharedRegistry`] to stay isolated.
pub trait Registry: Send + Sync {
    /// Mark the identifier as shown and consume a pending dismiss in one
    /// atomic step. Returns true when a pending dismiss was consumed, in
    /// which case the caller must not show.
    fn confirm_show(&self, identifier: &str) -> bool;

    /// Remove the identifier from the shown set at permanent teardown.
    fn deregister(&self, identifier: &str);

    /// Whether the identifier is currently shown.
    fn is_shown(&self, identifier: &str) -> bool;

    /// Route a dismiss request: signal a live host, or note it for a show
    /// that has not happened yet. One atomic step.
    fn route_dismiss(&self, identifier: &str) -> DismissRoute;

    /// Whether a dismiss is noted for the identifier. Mostly for tests.
    fn has_pending_dismiss(&self, identifier: &str) -> bool;
}

#[derive(Debug, Default)]
struct RegistryState {
    shown: HashSet<String>,
    pending_dismiss: HashSet<String>,
}

/// In-memory [`Registry`] guarded by a single mutex.
#[derive(Debug, Default)]
pub struct SharedRegistry {
    state: Mutex<RegistryState>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registry for SharedRegistry {
    fn confirm_show(&self, identifier: &str) -> bool {
        let mut state = self.state.lock().expect("lock poisoned");
        if !state.shown.insert(identifier.to_string()) {
            // Duplicate identifiers are last-writer-wins, deliberately.
            debug!("dialog {identifier}: already registered as shown");
        }
        let raced = state.pending_dismiss.remove(identifier);
        if raced {
            debug!("dialog {identifier}: consumed dismiss that raced ahead of show");
        }
        raced
    }

    fn deregister(&self, identifier: &str) {
        let mut state = self.state.lock().expect("lock poisoned");
        state.shown.remove(identifier);
    }

    fn is_shown(&self, identifier: &str) -> bool {
        let state = self.state.lock().expect("lock poisoned");
        state.shown.contains(identifier)
    }

    fn route_dismiss(&self, identifier: &str) -> DismissRoute {
        let mut state = self.state.lock().expect("lock poisoned");
        if state.shown.contains(identifier) {
            DismissRoute::SignalLive
        } else {
            state.pending_dismiss.insert(identifier.to_string());
            debug!("dialog {identifier}: dismiss noted before show");
            DismissRoute::Noted
        }
    }

    fn has_pending_dismiss(&self, identifier: &str) -> bool {
        let state = self.state.lock().expect("lock poisoned");
        state.pending_dismiss.contains(identifier)
    }
}

static SHARED: Lazy<Arc<SharedRegistry>> = Lazy::new(|| Arc::new(SharedRegistry::new()));

/// The process-wide registry every host uses unless one is injected.
pub fn shared_registry() -> Arc<SharedRegistry> {
    Arc::clone(&SHARED)
}
