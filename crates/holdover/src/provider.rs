//! Content hand-off between the caller and the host.
//!
//! Content objects cannot ride inside a serialized request, so callers
//! deposit them in a vault and pass the generated handle instead. The host
//! claims the deposit at first creation; claims are one-shot, and a handle
//! that was already claimed (or never existed) resolves to nothing, which the
//! host treats as silent abandonment.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::content::DialogContent;

/// Resolves content handles to content objects.
pub trait ContentProvider: Send + Sync {
    /// Claim the content for a handle, removing it. `None` when the handle
    /// is unknown or already claimed.
    fn claim(&self, provider_id: &str) -> Option<Box<dyn DialogContent + Send>>;
}

/// In-memory one-shot deposit store with generated handles.
#[derive(Default)]
pub struct ContentVault {
    slots: Mutex<HashMap<String, Box<dyn DialogContent + Send>>>,
    counter: AtomicU64,
}

impl ContentVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit content and get the handle to reference it by.
    pub fn deposit<C: DialogContent + Send + 'static>(&self, content: C) -> String {
        self.deposit_boxed(Box::new(content))
    }

    /// Deposit an already-boxed content object.
    pub fn deposit_boxed(&self, content: Box<dyn DialogContent + Send>) -> String {
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        let handle = format!("content-{id}");
        self.slots
            .lock()
            .expect("lock poisoned")
            .insert(handle.clone(), content);
        handle
    }

    /// Whether a handle still has an unclaimed deposit.
    pub fn holds(&self, provider_id: &str) -> bool {
        self.slots
            .lock()
            .expect("lock poisoned")
            .contains_key(provider_id)
    }
}

impl ContentProvider for ContentVault {
    fn claim(&self, provider_id: &str) -> Option<Box<dyn DialogContent + Send>> {
        self.slots.lock().expect("lock poisoned").remove(provider_id)
    }
}

impl std::fmt::Debug for ContentVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.lock().expect("lock poisoned");
        f.debug_struct("ContentVault")
            .field("deposits", &slots.len())
            .finish_non_exhaustive()
    }
}

static SHARED: Lazy<Arc<ContentVault>> = Lazy::new(|| Arc::new(ContentVault::new()));

/// The process-wide vault every host uses unless one is injected.
pub fn shared_vault() -> Arc<ContentVault> {
    Arc::clone(&SHARED)
}
