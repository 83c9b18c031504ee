//! Log file location and timestamps.
use std::ffi::OsString;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Directory name under the cache root.
const LOG_DIR_NAME: &str = "statics-merger";

/// Resolve the log directory from `XDG_CACHE_HOME` and `HOME`.
///
/// An empty `XDG_CACHE_HOME` counts as unset. With neither variable the
/// directory is relative to the working directory.
fn log_dir_from(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let cache_root = xdg_cache_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".cache")))
        .unwrap_or_else(|| PathBuf::from(".cache"));
    cache_root.join(LOG_DIR_NAME)
}

/// Path of the log file for `command`, creating its directory.
///
/// Returns `None` if the directory cannot be created; logging to file is
/// then disabled for the run.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = log_dir_from(
        std::env::var_os("XDG_CACHE_HOME"),
        std::env::var_os("HOME"),
    );
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current time, the single clock read by the file layer.
pub(super) fn now() -> DateTime<Utc> {
    Utc::now()
}
