//! Scoped listener registration
//!
//! Subscribing to the messaging channel yields a [`Subscription`]; its
//! unsubscribe action runs exactly once, either through [`Subscription::release`]
//! or when the handle is dropped.

/// Handle to an active listener registration.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps the action that undoes a registration.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Unsubscribes now.
    pub fn release(mut self) {
        self.run_release();
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
