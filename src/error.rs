//! Domain-specific error types for the statics merger.
//!
//! Internal modules return typed errors (e.g. [`ConfigError`], [`RuleError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! - [`ConfigError`]: manifest and installed.json loading; fails the command
//! - [`RuleError`]: a single file rule that cannot be expanded; skips the rule
//! - [`WalkError`]: enumeration failure during cleanup; skips the entry
//!
//! Per-link outcomes (missing source, occupied destination, failed
//! `symlink(2)`) are not errors: they are reported and counted by the
//! reconciler, see [`crate::resources::symlink::LinkOutcome`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while loading the root manifest or the installed
/// package list.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but does not have the expected structure.
    #[error("Invalid configuration in {file}: {message}")]
    InvalidSyntax {
        /// File that failed to parse.
        file: String,
        /// Parser message.
        message: String,
    },

    /// A theme identifier in `static-map` is not a safe relative path.
    #[error("Invalid theme '{theme}': {reason}")]
    InvalidTheme {
        /// The identifier as written in the manifest.
        theme: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A file rule would reach outside the package or the theme's `web`
    /// directory.
    #[error("Invalid rule for {package} in theme '{theme}': {reason}")]
    InvalidRule {
        /// Package the rule belongs to.
        package: String,
        /// Theme the rule belongs to.
        theme: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors for a single file rule. These skip the rule, never the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A literal source was mapped without a destination.
    #[error("Full path is required for: \"{src}\"")]
    MissingDestination {
        /// The literal source path of the rule.
        src: String,
    },

    /// The source pattern is not a valid glob.
    #[error("Invalid glob pattern \"{pattern}\": {message}")]
    InvalidPattern {
        /// The rule's source pattern.
        pattern: String,
        /// Message from the glob parser.
        message: String,
    },
}

/// A path under a theme root could not be enumerated.
#[derive(Error, Debug)]
#[error("cannot read {}: {source}", path.display())]
pub struct WalkError {
    /// Entry (or directory) that failed.
    pub path: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: std::io::Error,
}
