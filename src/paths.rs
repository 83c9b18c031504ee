//! Path primitives: separator normalization, joining, and relative symlink
//! targets.
//!
//! Rule paths and theme identifiers are stored as forward-slash strings that
//! have passed through [`normalize_separators`] exactly once, at load time.
//! Everything that turns those strings back into filesystem paths goes
//! through [`join_relative`].
use std::path::{Component, Path, PathBuf};

/// Normalize a relative path string to forward-slash segments.
///
/// Backslashes become `/`, empty and `.` segments are dropped, and leading
/// and trailing separators are removed. `..` segments are kept; callers
/// that must reject them check [`has_parent_segment`].
///
/// ```
/// use statics_merger::paths::normalize_separators;
///
/// assert_eq!(normalize_separators("images//catalog/"), "images/catalog");
/// assert_eq!(normalize_separators("./css\\print.css"), "css/print.css");
/// assert_eq!(normalize_separators("/"), "");
/// ```
#[must_use]
pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a normalized path contains a `..` segment.
#[must_use]
pub fn has_parent_segment(normalized: &str) -> bool {
    normalized.split('/').any(|segment| segment == "..")
}

/// Join a normalized forward-slash relative path onto `base`.
///
/// An empty `relative` yields `base` unchanged.
#[must_use]
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` above the root is discarded, matching how the kernel resolves
/// `/..`.
#[must_use]
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Compute the path of `to` relative to the directory containing `from`.
///
/// The result is intended as a symlink target: a link created at `from`
/// whose content is the returned string resolves to `to`. Paths that denote
/// an existing directory are treated as directories (a trailing separator
/// is implied), so `from` itself becomes the base.
///
/// No canonicalization is performed; both paths must already be in
/// comparable form (both absolute, or both relative to the same base).
///
/// ```
/// use std::path::Path;
/// use statics_merger::paths::relative_path;
///
/// assert_eq!(
///     relative_path(Path::new("a/short/dir/assets/test"), Path::new("a/vendor/module/files/test")),
///     "../../../vendor/module/files/test"
/// );
/// assert_eq!(
///     relative_path(Path::new("same/dir/assets/test"), Path::new("same/dir/assets/file")),
///     "./file"
/// );
/// ```
#[must_use]
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from_segments = segments(from);
    let to_segments = segments(to);

    let mut relative: Vec<String> = to_segments.clone();
    for (depth, segment) in from_segments.iter().enumerate() {
        if to_segments.get(depth) == Some(segment) {
            relative.remove(0);
            continue;
        }

        let remaining = from_segments.len() - depth;
        if remaining > 1 {
            let mut padded = vec!["..".to_string(); remaining - 1];
            padded.append(&mut relative);
            return padded.join("/");
        }
        return dot_prefixed(relative);
    }

    if relative.is_empty() {
        // Same path: the link points at its own name in the same directory.
        return dot_prefixed(to_segments.last().cloned().into_iter().collect());
    }
    relative.join("/")
}

/// Prefix the first segment with `./`; an empty list means "this directory".
fn dot_prefixed(mut relative: Vec<String>) -> String {
    match relative.first_mut() {
        Some(first) => {
            *first = format!("./{first}");
            relative.join("/")
        }
        None => ".".to_string(),
    }
}

/// Split a path into forward-slash segments, appending an empty trailing
/// segment when the path is an existing directory.
fn segments(path: &Path) -> Vec<String> {
    let mut text = path.to_string_lossy().replace('\\', "/");
    if path.is_dir() && !text.ends_with('/') {
        text.push('/');
    }
    text.split('/').map(str::to_string).collect()
}
