//! Console and log-file rendering of report lines.
//!
//! Every report travels as a [`tracing`] event. The event target separates
//! stage headers, task records and summary rows from ordinary report lines;
//! for ordinary lines the level separates configuration notices (info) from
//! rule problems (error). Both layers classify events the same way through
//! [`LineKind`] and differ only in how a line is drawn.
use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::Level;
use tracing::field::{Field, Visit};

use super::logger::{STAGE_TARGET, SUMMARY_TARGET, TASK_TARGET};
use super::utils::{log_file_path, now};

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";

/// How an event is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Stage,
    Notice,
    Warning,
    Problem,
    Detail,
    TaskRecord,
    SummaryRow,
}

impl LineKind {
    fn of(level: Level, target: &str) -> Self {
        match target {
            STAGE_TARGET => Self::Stage,
            TASK_TARGET => Self::TaskRecord,
            SUMMARY_TARGET => Self::SummaryRow,
            _ if level == Level::ERROR => Self::Problem,
            _ if level == Level::WARN => Self::Warning,
            _ if level == Level::INFO => Self::Notice,
            _ => Self::Detail,
        }
    }
}

/// Fields of one report event.
#[derive(Debug, Default)]
struct ReportFields {
    message: String,
    task: Option<String>,
    status: Option<String>,
}

impl ReportFields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

impl Visit for ReportFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "task" => self.task = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

/// Glyph and colour for a task status label.
fn status_style(status: &str) -> (&'static str, &'static str) {
    match status {
        "ok" => ("✓", GREEN),
        "skipped" => ("○", YELLOW),
        _ => ("✗", RED),
    }
}

/// The console line for an event, or `None` for events the console does
/// not show.
fn console_line(kind: LineKind, fields: &ReportFields) -> Option<String> {
    let msg = &fields.message;
    Some(match kind {
        LineKind::Stage => format!("\x1b[1;34m==>{RESET} \x1b[1m{msg}{RESET}"),
        LineKind::Notice => format!("{GREEN}{msg}{RESET}"),
        LineKind::Warning => format!("{YELLOW}WARN{RESET}  {msg}"),
        LineKind::Problem => format!("{RED}ERROR{RESET} {msg}"),
        LineKind::Detail => format!("  {DIM}{msg}{RESET}"),
        LineKind::SummaryRow => match fields.status.as_deref() {
            Some(status) => {
                let (glyph, colour) = status_style(status);
                format!("  {colour}{glyph} {msg}{RESET}")
            }
            None => format!("  {msg}"),
        },
        LineKind::TaskRecord => return None,
    })
}

/// The log-file line for an event, or `None` for events the file does not
/// record. Task outcomes are kept through their records, so summary rows
/// are left out.
fn file_line(kind: LineKind, fields: &ReportFields, at: DateTime<Utc>) -> Option<String> {
    let ts = at.format("%H:%M:%S");
    let msg = &fields.message;
    Some(match kind {
        LineKind::Stage => format!("[{ts}] ==> {msg}"),
        LineKind::Notice => format!("[{ts}]     {msg}"),
        LineKind::Warning => format!("[{ts}]     [warn] {msg}"),
        LineKind::Problem => format!("[{ts}]     [error] {msg}"),
        LineKind::Detail => format!("[{ts}]     [debug] {msg}"),
        LineKind::TaskRecord => {
            let task = fields.task.as_deref().unwrap_or("?");
            let status = fields.status.as_deref().unwrap_or("?");
            if msg.is_empty() {
                format!("[{ts}] task {task}: {status}")
            } else {
                format!("[{ts}] task {task}: {status} ({msg})")
            }
        }
        LineKind::SummaryRow => return None,
    })
}

/// A [`tracing_subscriber::Layer`] appending plain-text report lines and
/// task outcomes to the per-command log file.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command` under the cache directory.
    ///
    /// Returns `None` if the file is unavailable.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::create(&log_file_path(command)?, command).ok()
    }

    /// Truncate `path`, write a run header and return a layer appending to it.
    fn create(path: &Path, command: &str) -> io::Result<Self> {
        let header = format!(
            "# statics-merger {} {command} {}\n",
            crate::commands::version::version(),
            now().format("%Y-%m-%d %H:%M:%S UTC"),
        );
        fs::write(path, header)?;
        let file = fs::OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn append(&self, line: &str) {
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let kind = LineKind::of(*metadata.level(), metadata.target());
        if let Some(line) = file_line(kind, &ReportFields::of(event), now()) {
            self.append(&line);
        }
    }
}

/// Console formatter for report lines.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let kind = LineKind::of(*metadata.level(), metadata.target());
        match console_line(kind, &ReportFields::of(event)) {
            Some(line) => writeln!(writer, "{line}"),
            None => Ok(()),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Notices and summary rows go to stdout, warnings and rule problems to
/// stderr. Per-link detail reaches the console only when `verbose`;
/// `RUST_LOG` overrides the console filter when set. The log file at
/// `$XDG_CACHE_HOME/statics-merger/<command>.log` receives every event of
/// this crate, detail included. Must be called once at program startup.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _,
        filter::{LevelFilter, Targets},
        fmt,
        layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let make_writer = io::stderr
        .with_max_level(Level::WARN)
        .and(io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter);

    let file_layer = FileLayer::new(command).map(|layer| {
        layer.with_filter(Targets::new().with_target(env!("CARGO_CRATE_NAME"), LevelFilter::DEBUG))
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
