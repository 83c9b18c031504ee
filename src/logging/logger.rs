//! Structured logger with summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Target used for stage headers so the formatters can render them apart.
pub(super) const STAGE_TARGET: &str = "statics_merger::stage";

/// Target of the structured event emitted for each recorded task.
pub(super) const TASK_TARGET: &str = "statics_merger::task";

/// Target of the closing summary rows.
pub(super) const SUMMARY_TARGET: &str = "statics_merger::summary";

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that emits every report through [`tracing`] and collects task
/// results for the closing summary.
///
/// Console and file rendering are configured once by
/// [`init_subscriber`](super::subscriber::init_subscriber); this type only
/// remembers where the log file lives so the summary can point at it.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a task result for the summary.
    ///
    /// The outcome is also emitted as a structured event so the log file
    /// keeps it even if the run never reaches the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<String>) {
        tracing::info!(
            target: TASK_TARGET,
            task = name,
            status = status.label(),
            "{}",
            message.as_deref().unwrap_or_default()
        );
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message,
            });
        }
    }

    /// Return a clone of all recorded task entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the number of failed tasks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded tasks.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");
        for task in &tasks {
            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            tracing::info!(
                target: SUMMARY_TARGET,
                status = task.status.label(),
                "{}{suffix}",
                task.name
            );
        }

        let count = |status| tasks.iter().filter(|t| t.status == status).count();
        tracing::info!(
            target: SUMMARY_TARGET,
            "{} task(s): {} ok, {} skipped, {} failed",
            tasks.len(),
            count(TaskStatus::Ok),
            count(TaskStatus::Skipped),
            count(TaskStatus::Failed)
        );
        if let Some(path) = &self.log_file {
            tracing::info!(target: SUMMARY_TARGET, "log: {}", path.display());
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<String>) {
        self.record_task(name, status, message);
    }
}
