//! Single-slot registry for the global unauthorized (401) handler.
//!
//! Any HTTP call anywhere in the app that comes back 401 notifies this
//! registry, and the registered handler performs the sign-out state
//! clearing. Exactly one handler is registered at a time; the last
//! registration wins. Handlers capture `Arc`s of the live session state,
//! so the slot never holds a stale closure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

type Handler = Box<dyn Fn() + Send + Sync>;

/// Registration ticket; used to clear the slot only if still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationId(u64);

/// One-slot handler registry.
///
/// The process-wide instance from [`UnauthorizedRegistry::global`] is used
/// in production; tests construct their own to stay hermetic.
#[derive(Default)]
pub struct UnauthorizedRegistry {
    slot: Mutex<Option<(RegistrationId, Handler)>>,
    next_id: AtomicU64,
}

impl UnauthorizedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> Arc<UnauthorizedRegistry> {
        static GLOBAL: OnceLock<Arc<UnauthorizedRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(UnauthorizedRegistry::new())))
    }

    /// Installs `handler`, replacing any previous registration.
    pub fn set_handler<F>(&self, handler: F) -> RegistrationId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = RegistrationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some((id, Box::new(handler)));
        id
    }

    /// Clears the slot, but only if `id` is still the current registration.
    ///
    /// A handler installed after `id` is left untouched, so a stale owner
    /// tearing down cannot knock out its successor.
    pub fn clear_handler(&self, id: RegistrationId) {
        let mut slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if slot.as_ref().is_some_and(|(current, _)| *current == id) {
            *slot = None;
        }
    }

    /// Invokes the current handler, if any.
    ///
    /// Called by the HTTP layer on every 401 response, before the error
    /// is returned to the caller.
    pub fn notify(&self) {
        let slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some((_, handler)) = slot.as_ref() {
            handler();
        } else {
            tracing::debug!("401 received with no unauthorized handler registered");
        }
    }
}
