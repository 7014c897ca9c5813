//! Run notifications
//!
//! The coordinator reports run start, completion and failure through a
//! [`Notifier`]. Delivery to chat or mail systems lives outside this crate;
//! anything implementing the trait can be injected.

/// Receives human-readable status messages about a run
pub trait Notifier: Send + Sync {
    fn send(&self, message: &str);
}

/// Forwards messages to the tracing log
#[derive(Debug, Clone)]
pub struct TracingNotifier {
    name: String,
}

impl TracingNotifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Notifier for TracingNotifier {
    fn send(&self, message: &str) {
        tracing::info!(notifier = %self.name, "{}", message);
    }
}

/// Discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn send(&self, _message: &str) {}
}
