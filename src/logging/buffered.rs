//! In-memory report sink.
use std::sync::Mutex;

use super::logger::STAGE_TARGET;
use super::types::{Level, Log, TaskEntry, TaskStatus};

/// Captures every reported line in order.
///
/// Hosts that embed the engine use it to collect report lines for their own
/// output channel; tests use it to assert on exact messages.  Captured
/// lines can be replayed into [`tracing`] with [`flush`](Self::flush).
#[derive(Debug, Default)]
pub struct BufferedLog {
    entries: Mutex<Vec<(Level, String)>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl BufferedLog {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push((level, msg.to_string()));
        }
    }

    /// All captured `(level, message)` pairs.
    #[must_use]
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Captured messages at `level` or above, excluding stage headers.
    #[must_use]
    pub fn messages_at_least(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l >= level && *l != Level::Stage)
            .map(|(_, msg)| msg)
            .collect()
    }

    /// Captured error messages.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.messages_at_least(Level::Error)
    }

    /// Recorded task results.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Replay and clear the captured lines through `tracing`.
    pub fn flush(&self) {
        let drained = self
            .entries
            .lock()
            .map(|mut g| std::mem::take(&mut *g))
            .unwrap_or_default();
        for (level, msg) in drained {
            match level {
                Level::Debug => tracing::debug!("{msg}"),
                Level::Info => tracing::info!("{msg}"),
                Level::Stage => tracing::info!(target: STAGE_TARGET, "{msg}"),
                Level::Warn => tracing::warn!("{msg}"),
                Level::Error => tracing::error!("{msg}"),
            }
        }
    }
}

impl Log for BufferedLog {
    fn stage(&self, msg: &str) {
        self.push(Level::Stage, msg);
    }

    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<String>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_lines_in_order_with_levels() {
        let log = BufferedLog::new();
        log.stage("Link statics");
        log.info("No static maps defined");
        log.error("Failed to symlink a to b");
        log.debug("linked x");

        assert_eq!(
            log.entries(),
            vec![
                (Level::Stage, "Link statics".to_string()),
                (Level::Info, "No static maps defined".to_string()),
                (Level::Error, "Failed to symlink a to b".to_string()),
                (Level::Debug, "linked x".to_string()),
            ]
        );
        assert_eq!(log.errors(), vec!["Failed to symlink a to b".to_string()]);
        assert_eq!(
            log.messages_at_least(Level::Info),
            vec![
                "No static maps defined".to_string(),
                "Failed to symlink a to b".to_string()
            ]
        );
    }

    #[test]
    fn flush_drains_entries() {
        let log = BufferedLog::new();
        log.info("one");
        log.flush();
        assert!(log.entries().is_empty());
    }
}
