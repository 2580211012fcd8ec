//! Process-wide shared state.

use notify_debouncer_mini::Debouncer;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use crate::app_logger::{LOG_RING_CAPACITY, LogEntry, LogRingBuffer};
use crate::config::Settings;
use crate::frontmatter::FrontmatterCache;
use crate::notice::NoticeSink;

pub struct AppState {
    /// Cached settings so event handlers don't re-read from disk.
    pub settings: RwLock<Settings>,
    /// Sink for transient user-visible messages.
    pub notices: Arc<dyn NoticeSink>,
    /// Per-note front-matter cache, mtime-invalidated.
    pub frontmatter: FrontmatterCache,
    /// Local acting user, resolved once at startup. Never mutated.
    current_user: String,
    /// The vault watcher handle. At most one live watcher at any time;
    /// dropping the debouncer stops it.
    pub(crate) vault_watcher: Mutex<Option<Debouncer<notify::RecommendedWatcher>>>,
    /// Recent operational events, queryable without log files.
    log_buffer: Mutex<LogRingBuffer>,
    #[cfg(test)]
    test_sink: Option<Arc<crate::notice::BufferedNotices>>,
}

impl AppState {
    pub fn new(settings: Settings, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            settings: RwLock::new(settings),
            notices,
            frontmatter: FrontmatterCache::new(),
            current_user: crate::identity::current_username().to_string(),
            vault_watcher: Mutex::new(None),
            log_buffer: Mutex::new(LogRingBuffer::new(LOG_RING_CAPACITY)),
            #[cfg(test)]
            test_sink: None,
        }
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    /// Record an operational event in the ring buffer.
    pub fn log(&self, level: &str, source: &str, message: impl Into<String>) {
        self.log_buffer.lock().push(level, source, message.into());
    }

    /// Most recent log entries, oldest first (0 = all stored).
    pub fn recent_logs(&self, limit: usize) -> Vec<LogEntry> {
        self.log_buffer.lock().get_entries(limit)
    }

    /// State with a fixed user and a buffering notice sink, for tests
    /// that must not depend on the machine's real username.
    #[cfg(test)]
    pub(crate) fn for_tests(user: &str) -> Self {
        let sink = Arc::new(crate::notice::BufferedNotices::default());
        Self {
            settings: RwLock::new(Settings::default()),
            notices: sink.clone(),
            frontmatter: FrontmatterCache::new(),
            current_user: user.to_string(),
            vault_watcher: Mutex::new(None),
            log_buffer: Mutex::new(LogRingBuffer::new(LOG_RING_CAPACITY)),
            test_sink: Some(sink),
        }
    }

    /// Messages captured by the test sink.
    #[cfg(test)]
    pub(crate) fn test_notices(&self) -> Vec<String> {
        self.test_sink
            .as_ref()
            .map(|sink| sink.messages())
            .unwrap_or_default()
    }
}
