//! Transient user-facing notices.
//!
//! Notices are fire-and-forget: no delivery guarantee, no ordering
//! relative to other notices. The daemon prints them to stderr; tests
//! capture them in a buffer.

use parking_lot::Mutex;

/// Sink for transient user-visible messages.
pub trait NoticeSink: Send + Sync {
    fn show(&self, message: &str);
}

/// Prints notices to stderr with a source tag.
#[derive(Debug, Default)]
pub struct StderrNotices;

impl NoticeSink for StderrNotices {
    fn show(&self, message: &str) {
        eprintln!("[Notice] {message}");
    }
}

/// Collects notices in memory for assertions.
#[derive(Debug, Default)]
pub struct BufferedNotices {
    messages: Mutex<Vec<String>>,
}

impl BufferedNotices {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl NoticeSink for BufferedNotices {
    fn show(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
