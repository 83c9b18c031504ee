//! Core logging types: task entries, status, levels, and the [`Log`] trait.

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed; rule-level problems were reported along the way.
    Ok,
    /// Task did nothing because configuration short-circuited it.
    Skipped,
    /// Task aborted on an unexpected filesystem error.
    Failed,
}

impl TaskStatus {
    /// Lower-case name used in structured events and the log file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Severity of a reported line, as captured by
/// [`BufferedLog`](super::buffered::BufferedLog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Per-link detail, hidden on the console unless verbose.
    Debug,
    /// Configuration notices and summaries.
    Info,
    /// Section header.
    Stage,
    /// Something the user should look at.
    Warn,
    /// A rule, link or removal that did not go through.
    Error,
}

/// The report sink used by every pass.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`;
/// [`BufferedLog`](super::buffered::BufferedLog) keeps lines in memory.
#[cfg_attr(test, mockall::automock)]
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<String>);
}
