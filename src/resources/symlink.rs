//! Static-asset symlink resource.
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::logging::Log;
use crate::operations::{EntryKind, FileSystemOps};
use crate::paths::{join_relative, relative_path};

/// What currently occupies a link's destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// The source does not exist; nothing can be linked.
    SourceMissing,
    /// Nothing is at the destination yet.
    Absent,
    /// A symlink (possibly from a previous run, possibly broken) is there.
    Symlink,
    /// A real file or directory is there.
    Occupied(EntryKind),
}

/// Terminal result of reconciling one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The destination is now a symlink to the source.
    Linked,
    /// The source does not exist.
    MissingSource,
    /// A real file or directory occupies the destination and was left alone.
    NotASymlink,
    /// The OS refused to create the symlink.
    LinkCreationFailed,
}

impl LinkOutcome {
    /// Whether the destination now points at the source.
    #[must_use]
    pub const fn is_linked(self) -> bool {
        matches!(self, Self::Linked)
    }
}

/// A desired symlink from a theme's `web` directory into a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLink {
    /// Source path as written in the rule (relative to the package root).
    pub relative_source: String,
    /// Absolute path the symlink must resolve to.
    pub source: PathBuf,
    /// Absolute path of the symlink itself.
    pub destination: PathBuf,
}

impl StaticLink {
    /// Build a link from its two roots and the relative paths under each.
    #[must_use]
    pub fn new(
        source_root: &Path,
        relative_source: &str,
        theme_root: &Path,
        relative_destination: &str,
    ) -> Self {
        Self {
            relative_source: relative_source.to_string(),
            source: join_relative(source_root, relative_source),
            destination: join_relative(theme_root, relative_destination),
        }
    }

    /// Relative symlink content that resolves to [`source`](Self::source)
    /// from the destination's directory.
    #[must_use]
    pub fn target(&self) -> String {
        relative_path(&self.destination, &self.source)
    }

    /// Inspect the filesystem without changing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination exists but cannot be examined.
    pub fn current_state(&self, fs: &dyn FileSystemOps) -> io::Result<LinkState> {
        if !fs.exists(&self.source) {
            return Ok(LinkState::SourceMissing);
        }
        match fs.kind(&self.destination) {
            Ok(EntryKind::Symlink) => Ok(LinkState::Symlink),
            Ok(kind) => Ok(LinkState::Occupied(kind)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(LinkState::Absent),
            Err(e) => Err(e),
        }
    }

    /// Bring the destination in line with the source.
    ///
    /// Existing symlinks are always replaced. Real files and directories
    /// are never touched. Every outcome other than [`LinkOutcome::Linked`]
    /// is reported through `log`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the destination cannot be inspected, a stale
    /// link cannot be removed, or the parent directory cannot be created.
    pub fn reconcile(&self, fs: &dyn FileSystemOps, log: &dyn Log) -> Result<LinkOutcome> {
        let state = self
            .current_state(fs)
            .with_context(|| format!("inspect {}", self.destination.display()))?;

        match state {
            LinkState::SourceMissing => {
                log.error(&format!(
                    "The static package does not contain directory: \"{}\"",
                    self.relative_source
                ));
                return Ok(LinkOutcome::MissingSource);
            }
            LinkState::Occupied(_) => {
                log.error(&format!(
                    "Your static path: \"{}\" is currently not a symlink, please remove first",
                    self.destination.display()
                ));
                return Ok(LinkOutcome::NotASymlink);
            }
            LinkState::Symlink => {
                fs.remove_file(&self.destination).with_context(|| {
                    format!("remove stale link: {}", self.destination.display())
                })?;
            }
            LinkState::Absent => {
                if let Some(parent) = self.destination.parent() {
                    fs.create_dir_all(parent)
                        .with_context(|| format!("create parent: {}", parent.display()))?;
                }
            }
        }

        let target = self.target();
        if let Err(e) = fs.symlink(Path::new(&target), &self.destination) {
            log.error(&format!(
                "Failed to symlink {} to {}",
                self.source.display(),
                self.destination.display()
            ));
            log.debug(&format!("symlink error: {e}"));
            return Ok(LinkOutcome::LinkCreationFailed);
        }

        log.debug(&format!(
            "linked {} -> {target}",
            self.destination.display()
        ));
        Ok(LinkOutcome::Linked)
    }
}
