//! Expansion of a [`FileRule`] into concrete source/destination pairs.
use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::config::static_map::FileRule;
use crate::error::RuleError;
use crate::paths::normalize_separators;

/// Shell-like matching: `*` never crosses `/` or matches a leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// One concrete link to reconcile, relative to the package root and the
/// theme root respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPair {
    /// Source path under the package root.
    pub relative_source: String,
    /// Destination path under the theme's `web` directory.
    pub relative_destination: String,
}

impl LinkPair {
    fn new(relative_source: impl Into<String>, relative_destination: impl Into<String>) -> Self {
        Self {
            relative_source: relative_source.into(),
            relative_destination: relative_destination.into(),
        }
    }
}

/// Expand `rule` against `source_root`.
///
/// A literal rule yields exactly its own pair and is not checked against
/// the filesystem. A glob rule yields one pair per matching regular file,
/// in sorted order; directories that match are skipped. The result is
/// recomputed on every call, so an unchanged tree always expands the same.
///
/// # Errors
///
/// Returns [`RuleError::MissingDestination`] for a literal rule without a
/// destination, and [`RuleError::InvalidPattern`] if `src` is not a valid
/// glob.
pub fn expand(source_root: &Path, rule: &FileRule) -> Result<Vec<LinkPair>, RuleError> {
    if !rule.is_glob() {
        if rule.dest.is_empty() {
            return Err(RuleError::MissingDestination {
                src: rule.src.clone(),
            });
        }
        return Ok(vec![LinkPair::new(rule.src.clone(), rule.dest.clone())]);
    }

    let pattern = format!(
        "{}/{}",
        Pattern::escape(&source_root.to_string_lossy()),
        rule.src
    );
    let matches =
        glob::glob_with(&pattern, MATCH_OPTIONS).map_err(|e| RuleError::InvalidPattern {
            pattern: rule.src.clone(),
            message: e.msg.to_string(),
        })?;

    Ok(matches
        .flatten()
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let relative = path.strip_prefix(source_root).ok()?;
            let relative_source = normalize_separators(&relative.to_string_lossy());
            let relative_destination = if rule.dest.is_empty() {
                relative_source.clone()
            } else {
                let file_name = path.file_name()?.to_string_lossy();
                format!("{}/{file_name}", rule.dest)
            };
            Some(LinkPair::new(relative_source, relative_destination))
        })
        .collect())
}
