//! Shared fixtures for the integration suites.

use std::sync::Arc;

use holdover::{DismissBus, HostDeps, RecordingSink, Registry, SharedRegistry};

/// Host collaborators isolated from the process-wide singletons, so suites
/// can run in parallel without touching shared state.
pub fn isolated_deps(sink: &RecordingSink) -> (HostDeps, Arc<SharedRegistry>, DismissBus) {
    let registry = Arc::new(SharedRegistry::new());
    let bus = DismissBus::new();
    let shared: Arc<dyn Registry> = registry.clone();
    let deps = HostDeps::new()
        .registry(shared)
        .bus(bus.clone())
        .sink(sink.sink());
    (deps, registry, bus)
}
