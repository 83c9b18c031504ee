//! Filesystem operation abstractions for dependency injection.
//!
//! Every mutation the link and cleanup passes perform goes through the
//! [`FileSystemOps`] trait so that failure paths (a refused `symlink(2)`, an
//! undeletable entry) can be exercised in tests.  Production code uses
//! [`SystemFileSystemOps`].
use std::io;
use std::path::{Path, PathBuf};

use crate::error::WalkError;

/// What an `lstat` of a path reports, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A symbolic link, whether or not its target exists.
    Symlink,
    /// A real directory.
    Dir,
    /// A regular file.
    File,
    /// Sockets, devices, FIFOs.
    Other,
}

/// Abstraction over the filesystem calls made by the link and cleanup passes.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Classify `path` without following symlinks.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::NotFound`] if nothing exists at `path`.
    fn kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` whose content is `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Remove a file or symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails, including when it is not empty.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Returns `true` if the directory at `path` has no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn is_empty_dir(&self, path: &Path) -> io::Result<bool>;

    /// Every entry below `root` (not `root` itself), without following
    /// symlinks.  Entries that cannot be read are returned as errors in
    /// place so the caller can report them and continue.
    fn walk(&self, root: &Path) -> Vec<Result<PathBuf, WalkError>>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        let file_type = std::fs::symlink_metadata(path)?.file_type();
        Ok(if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(not(unix))]
        {
            let _ = (target, link);
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "symlinks are only supported on unix platforms",
            ))
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(std::fs::read_dir(path)?.next().is_none())
    }

    fn walk(&self, root: &Path) -> Vec<Result<PathBuf, WalkError>> {
        walkdir::WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .map(|entry| {
                entry.map(walkdir::DirEntry::into_path).map_err(|e| {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    WalkError {
                        path,
                        source: e.into(),
                    }
                })
            })
            .collect()
    }
}

/// Fault-injecting [`FileSystemOps`] for unit tests.
///
/// Delegates to [`SystemFileSystemOps`] except for the paths registered
/// with [`fail_symlink`](Self::fail_symlink) or
/// [`fail_remove`](Self::fail_remove), which return
/// [`io::ErrorKind::PermissionDenied`].
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FaultyFileSystemOps {
    symlink_failures: Vec<PathBuf>,
    remove_failures: Vec<PathBuf>,
    fail_every_symlink: bool,
}

#[cfg(test)]
impl FaultyFileSystemOps {
    /// Create a wrapper with no faults configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to create a symlink at `link`.
    #[must_use]
    pub fn fail_symlink(mut self, link: impl Into<PathBuf>) -> Self {
        self.symlink_failures.push(link.into());
        self
    }

    /// Refuse every symlink creation.
    #[must_use]
    pub const fn fail_all_symlinks(mut self) -> Self {
        self.fail_every_symlink = true;
        self
    }

    /// Refuse to remove `path` (file, symlink or directory).
    #[must_use]
    pub fn fail_remove(mut self, path: impl Into<PathBuf>) -> Self {
        self.remove_failures.push(path.into());
        self
    }

    fn denied(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("injected failure: {}", path.display()),
        )
    }
}

#[cfg(test)]
impl FileSystemOps for FaultyFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        SystemFileSystemOps.exists(path)
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        SystemFileSystemOps.kind(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        SystemFileSystemOps.create_dir_all(path)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        if self.fail_every_symlink || self.symlink_failures.iter().any(|p| p == link) {
            return Err(Self::denied(link));
        }
        SystemFileSystemOps.symlink(target, link)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.remove_failures.iter().any(|p| p == path) {
            return Err(Self::denied(path));
        }
        SystemFileSystemOps.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        if self.remove_failures.iter().any(|p| p == path) {
            return Err(Self::denied(path));
        }
        SystemFileSystemOps.remove_dir(path)
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        SystemFileSystemOps.is_empty_dir(path)
    }

    fn walk(&self, root: &Path) -> Vec<Result<PathBuf, WalkError>> {
        SystemFileSystemOps.walk(root)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_classifies_entries() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.css");
        std::fs::write(&file, "body {}").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();

        let fs = SystemFileSystemOps;
        assert_eq!(fs.kind(&file).unwrap(), EntryKind::File);
        assert_eq!(fs.kind(&sub).unwrap(), EntryKind::Dir);
        assert_eq!(
            fs.kind(&dir.path().join("missing")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[cfg(unix)]
    #[test]
    fn kind_reports_broken_symlink_as_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("does/not/exist", &link).unwrap();

        let fs = SystemFileSystemOps;
        assert_eq!(fs.kind(&link).unwrap(), EntryKind::Symlink);
        assert!(!fs.exists(&link));
    }

    #[test]
    fn is_empty_dir_detects_contents() {
        let dir = tempfile::tempdir().unwrap();
        let fs = SystemFileSystemOps;
        assert!(fs.is_empty_dir(dir.path()).unwrap());
        std::fs::write(dir.path().join("a"), "").unwrap();
        assert!(!fs.is_empty_dir(dir.path()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn walk_lists_descendants_without_following_links() {
        let dir = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        std::fs::write(target.path().join("inner.txt"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("a/b/c.txt"), "").unwrap();
        std::os::unix::fs::symlink(target.path(), dir.path().join("a/linked")).unwrap();

        let mut entries: Vec<PathBuf> = SystemFileSystemOps
            .walk(dir.path())
            .into_iter()
            .map(Result::unwrap)
            .collect();
        entries.sort();

        assert_eq!(
            entries,
            vec![
                dir.path().join("a"),
                dir.path().join("a/b"),
                dir.path().join("a/b/c.txt"),
                dir.path().join("a/linked"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn faulty_ops_refuse_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        let fs = FaultyFileSystemOps::new()
            .fail_symlink(&link)
            .fail_remove(dir.path());

        let err = fs.symlink(Path::new("target"), &link).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(fs.kind(&link).is_err(), "no link should have been created");

        let err = fs.remove_dir(dir.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
