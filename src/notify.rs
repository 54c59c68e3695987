use std::sync::{Arc, Mutex};

/// Seam for transient user-facing notices ("Failed to fetch your courses").
/// A notice names the action that failed; it is never a retry mechanism.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Production notifier: prints to stderr and records a warning in the log.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!("{message}");
        eprintln!("{message}");
    }
}

/// Collects notices in memory so tests can assert on what the user saw.
#[derive(Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock poisoned")
            .push(message.to_string());
    }
}
