//! Removal of linked content from a theme's `web` directory.
use std::io;
use std::path::{Path, PathBuf};

use crate::logging::Log;
use crate::operations::{EntryKind, FileSystemOps};

/// Counts from one cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupStats {
    /// Symlinks removed.
    pub links_removed: usize,
    /// Directories removed because they were left empty.
    pub dirs_removed: usize,
    /// Real files and non-empty directories left in place.
    pub kept: usize,
    /// Entries that could not be removed or read.
    pub failed: usize,
}

impl CleanupStats {
    /// Add another pass's counts into this one.
    pub const fn absorb(&mut self, other: Self) {
        self.links_removed += other.links_removed;
        self.dirs_removed += other.dirs_removed;
        self.kept += other.kept;
        self.failed += other.failed;
    }
}

enum Disposition {
    RemovedLink,
    RemovedDir,
    Kept,
}

/// Remove every symlink under `theme_root`, then every directory left
/// empty, never touching real files.
///
/// Entries are visited longest path first, so every descendant is handled
/// before its ancestor. `theme_root` itself is kept. A missing root is a
/// no-op. Failures are reported against `package` and do not stop the pass.
pub fn cleanup(
    theme_root: &Path,
    package: &str,
    fs: &dyn FileSystemOps,
    log: &dyn Log,
) -> CleanupStats {
    let mut stats = CleanupStats::default();
    if !matches!(fs.kind(theme_root), Ok(EntryKind::Dir)) {
        log.debug(&format!("nothing to clean at {}", theme_root.display()));
        return stats;
    }

    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in fs.walk(theme_root) {
        match entry {
            Ok(path) => entries.push(path),
            Err(e) => {
                log.error(&format!(
                    "Failed to remove {package} from {}",
                    e.path.display()
                ));
                log.debug(&e.to_string());
                stats.failed += 1;
            }
        }
    }
    entries.sort_by_key(|path| std::cmp::Reverse(path.as_os_str().len()));

    for path in &entries {
        match remove_entry(path, fs) {
            Ok(Disposition::RemovedLink) => {
                log.debug(&format!("removed link {}", path.display()));
                stats.links_removed += 1;
            }
            Ok(Disposition::RemovedDir) => {
                log.debug(&format!("removed empty directory {}", path.display()));
                stats.dirs_removed += 1;
            }
            Ok(Disposition::Kept) => stats.kept += 1,
            Err(e) => {
                log.error(&format!("Failed to remove {package} from {}", path.display()));
                log.debug(&format!("{}: {e}", path.display()));
                stats.failed += 1;
            }
        }
    }

    stats
}

fn remove_entry(path: &Path, fs: &dyn FileSystemOps) -> io::Result<Disposition> {
    match fs.kind(path)? {
        EntryKind::Symlink => {
            fs.remove_file(path)?;
            Ok(Disposition::RemovedLink)
        }
        EntryKind::Dir if fs.is_empty_dir(path)? => {
            fs.remove_dir(path)?;
            Ok(Disposition::RemovedDir)
        }
        EntryKind::Dir | EntryKind::File | EntryKind::Other => Ok(Disposition::Kept),
    }
}
