//! Presentation side-effect seam.
//!
//! Spinners and toasts are rendered by whatever UI embeds this client; the
//! operations only signal the trigger points. Headless callers use
//! [`NoopHooks`].

use std::sync::Arc;

/// Loading-state and notification callbacks invoked by the operations.
pub trait UiHooks: Send + Sync {
    /// An operation with a remote leg started.
    fn loading_started(&self, message: &str) {
        let _ = message;
    }

    /// The operation finished, successfully or not.
    fn loading_finished(&self) {}

    /// Non-blocking notification.
    fn toast(&self, message: &str) {
        let _ = message;
    }
}

/// Hooks that drop every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl UiHooks for NoopHooks {}

pub type SharedHooks = Arc<dyn UiHooks>;

/// Pairs `loading_started` with a guaranteed `loading_finished` on every
/// exit path of an operation.
pub(crate) struct LoadingGuard {
    hooks: SharedHooks,
}

impl LoadingGuard {
    pub(crate) fn start(hooks: &SharedHooks, message: &str) -> Self {
        hooks.loading_started(message);
        Self {
            hooks: Arc::clone(hooks),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.hooks.loading_finished();
    }
}
