use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::RootConfig;
use crate::config::packages::Package;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::paths::normalize_lexical;

/// Design directory under the Magento root that holds frontend themes.
pub const FRONTEND_DESIGN_DIR: &str = "app/design/frontend";

/// Shared context for task execution.
pub struct Context {
    /// Configuration loaded from the root manifest.
    pub config: Arc<RootConfig>,
    /// Installed packages, aliases already unwrapped.
    pub packages: Arc<Vec<Package>>,
    /// Absolute project root; the base for `magento-root-dir`.
    pub project_root: PathBuf,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("packages", &self.packages.len())
            .field("project_root", &self.project_root)
            .field("log", &"<dyn Log>")
            .field("fs_ops", &self.fs_ops)
            .finish()
    }
}

impl Context {
    /// Creates a context that operates on the real filesystem.
    #[must_use]
    pub fn new(
        config: Arc<RootConfig>,
        packages: Arc<Vec<Package>>,
        project_root: PathBuf,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            config,
            packages,
            project_root,
            log,
            fs_ops: Arc::new(SystemFileSystemOps),
        }
    }

    /// Magento root: the project root joined with `magento-root-dir`, or the
    /// project root itself when the manifest does not set one.
    ///
    /// The result is lexically normalized so `.` and `..` segments never
    /// reach relative target computation.
    #[must_use]
    pub fn magento_root(&self) -> PathBuf {
        self.config.magento_root_dir.as_deref().map_or_else(
            || self.project_root.clone(),
            |dir| normalize_lexical(&self.project_root.join(dir)),
        )
    }

    /// `web` directory of `design_path` under `magento_root`.
    #[must_use]
    pub fn theme_root(magento_root: &Path, design_path: &str) -> PathBuf {
        crate::paths::join_relative(
            &crate::paths::join_relative(magento_root, FRONTEND_DESIGN_DIR),
            design_path,
        )
        .join("web")
    }

    /// Create a copy of this context with a different [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            packages: Arc::clone(&self.packages),
            project_root: self.project_root.clone(),
            log: Arc::clone(&self.log),
            fs_ops,
        }
    }

    /// Create a copy of this context with a different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            log,
            ..self.with_fs_ops(Arc::clone(&self.fs_ops))
        }
    }
}
