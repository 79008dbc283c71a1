//! The remote dismiss channel.
//!
//! A broadcast-style one-to-many signal scoped by identifier. Hosts subscribe
//! while visible; [`request_dismiss`] tells whichever host currently owns an
//! identifier to close, or notes the request in the registry when no host is
//! listening yet.

use std::fmt;
use std::sync::{Arc, Mutex};

use log::debug;
use once_cell::sync::Lazy;

use crate::registry::{shared_registry, DismissRoute, Registry};

type DismissCallback = Arc<dyn Fn() + Send + Sync>;

struct Subscriber {
    id: u64,
    identifier: String,
    callback: DismissCallback,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Identifier-scoped dismiss broadcast.
///
/// Cheap to clone; clones share the subscriber table. Delivery is
/// best-effort: signalling an identifier nobody listens for is a no-op.
#[derive(Clone, Default)]
pub struct DismissBus {
    state: Arc<Mutex<BusState>>,
}

impl DismissBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for dismiss signals scoped to `identifier`.
    ///
    /// The subscription ends when the returned [`Subscription`] is dropped.
    pub fn subscribe(
        &self,
        identifier: &str,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Subscription {
        let mut state = self.state.lock().expect("lock poisoned");
        state.next_id += 1;
        let id = state.next_id;
        state.subscribers.push(Subscriber {
            id,
            identifier: identifier.to_string(),
            callback: Arc::new(callback),
        });
        Subscription {
            state: Arc::clone(&self.state),
            id,
        }
    }

    /// Signal every subscriber listening for `identifier`. Returns how many
    /// were notified.
    pub fn signal(&self, identifier: &str) -> usize {
        // Callbacks run outside the lock so they may subscribe or drop
        // subscriptions themselves.
        let callbacks: Vec<DismissCallback> = {
            let state = self.state.lock().expect("lock poisoned");
            state
                .subscribers
                .iter()
                .filter(|s| s.identifier == identifier)
                .map(|s| Arc::clone(&s.callback))
                .collect()
        };
        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.state.lock().expect("lock poisoned").subscribers.len()
    }
}

impl fmt::Debug for DismissBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().expect("lock poisoned");
        f.debug_struct("DismissBus")
            .field("subscribers", &state.subscribers.len())
            .finish_non_exhaustive()
    }
}

/// RAII handle for a [`DismissBus`] subscription.
pub struct Subscription {
    state: Arc<Mutex<BusState>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut state = self.state.lock().expect("lock poisoned");
        state.subscribers.retain(|s| s.id != self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

static SHARED: Lazy<DismissBus> = Lazy::new(DismissBus::new);

/// The process-wide dismiss bus every host uses unless one is injected.
pub fn shared_bus() -> DismissBus {
    SHARED.clone()
}

/// Ask whichever host owns `identifier` to close, using the process-wide
/// registry and bus.
///
/// Best-effort and order-independent: a dismiss issued before the show is
/// consumed by the show-confirmation check; a dismiss issued after it is
/// signalled to the live host; either order converges to "not shown".
pub fn request_dismiss(identifier: &str) {
    request_dismiss_with(shared_registry().as_ref(), &shared_bus(), identifier);
}

/// [`request_dismiss`] against explicit collaborators.
pub fn request_dismiss_with(registry: &dyn Registry, bus: &DismissBus, identifier: &str) {
    match registry.route_dismiss(identifier) {
        DismissRoute::SignalLive => {
            let notified = bus.signal(identifier);
            debug!("dialog {identifier}: dismiss signalled to {notified} listener(s)");
        }
        DismissRoute::Noted => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::registry::SharedRegistry;

    #[test]
    fn signal_reaches_matching_subscriber() {
        let bus = DismissBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let _sub = bus.subscribe("d1", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.signal("d1"), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn signal_ignores_other_identifiers() {
        let bus = DismissBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let _sub = bus.subscribe("d1", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.signal("d2"), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = DismissBus::new();
        let sub = bus.subscribe("d1", || {});
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.signal("d1"), 0);
    }

    #[test]
    fn signal_without_listeners_is_a_noop() {
        let bus = DismissBus::new();
        assert_eq!(bus.signal("ghost"), 0);
    }

    #[test]
    fn request_routes_to_live_listener() {
        let registry = SharedRegistry::new();
        let bus = DismissBus::new();
        registry.confirm_show("d1");

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let _sub = bus.subscribe("d1", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        request_dismiss_with(&registry, &bus, "d1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!registry.has_pending_dismiss("d1"));
    }

    #[test]
    fn request_before_show_is_noted() {
        let registry = SharedRegistry::new();
        let bus = DismissBus::new();

        request_dismiss_with(&registry, &bus, "d1");
        assert!(registry.has_pending_dismiss("d1"));
    }
}
