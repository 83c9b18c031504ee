pub mod clean;
pub mod hook;
pub mod link;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::RootConfig;
use crate::config::packages::{self, Package};
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, Task};

/// Shared state produced by the common command setup sequence.
///
/// Resolves the project root and loads the manifest and the installed
/// packages so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Canonical project root.
    pub project_root: PathBuf,
    /// Parsed root manifest.
    pub config: RootConfig,
    /// Installed packages.
    pub packages: Vec<Package>,
}

impl CommandSetup {
    /// Resolve the root and load all configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be resolved, or if the
    /// manifest or the installed package list cannot be read or parsed.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let project_root = resolve_root(global)?;
        log.debug(&format!("project root: {}", project_root.display()));

        let config = RootConfig::load(&project_root, global.config.as_deref())
            .context("loading root manifest")?;
        let vendor_dir = config.vendor_path(&project_root);
        let packages = packages::load(&vendor_dir, log).context("loading installed packages")?;

        log.debug(&format!(
            "{} installed package(s), {} with the '{}' type",
            packages.len(),
            packages.iter().filter(|p| p.is_static()).count(),
            packages::STATIC_PACKAGE_TYPE
        ));

        Ok(Self {
            project_root,
            config,
            packages,
        })
    }
}

/// Resolve the project root from `--root` or the current directory.
///
/// # Errors
///
/// Returns an error if the directory does not exist or the current
/// directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let root = match &global.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("determining current directory")?,
    };
    dunce::canonicalize(&root).with_context(|| format!("resolving root: {}", root.display()))
}

/// Loaded context plus the logger that collects the summary.
#[derive(Debug)]
pub struct CommandRunner {
    ctx: Context,
    log: Arc<Logger>,
}

impl CommandRunner {
    /// Run the setup sequence and build the task context.
    ///
    /// # Errors
    ///
    /// Returns an error if [`CommandSetup::init`] fails.
    pub fn new(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        let setup = CommandSetup::init(global, &**log)?;
        let ctx = Context::new(
            Arc::new(setup.config),
            Arc::new(setup.packages),
            setup.project_root,
            Arc::clone(log) as Arc<dyn Log>,
        );
        Ok(Self {
            ctx,
            log: Arc::clone(log),
        })
    }

    /// Run `tasks` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if one or more tasks failed.
    pub fn run<'a>(&self, tasks: impl IntoIterator<Item = &'a dyn Task>) -> Result<()> {
        run_tasks_to_completion(tasks, &self.ctx, &self.log)
    }
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::BufferedLog;

    fn global(root: Option<PathBuf>) -> GlobalOpts {
        GlobalOpts { root, config: None }
    }

    #[test]
    fn resolve_root_canonicalizes() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a");
        std::fs::create_dir(&nested).unwrap();
        let resolved = resolve_root(&global(Some(nested.join("..").join("a")))).unwrap();
        assert_eq!(resolved, dunce::canonicalize(&nested).unwrap());
    }

    #[test]
    fn resolve_root_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_root(&global(Some(dir.path().join("missing")))).unwrap_err();
        assert!(err.to_string().contains("resolving root"));
    }

    #[test]
    fn setup_loads_manifest_and_packages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("composer.json"),
            r#"{"extra": {"static-map": {"a/b": {"package/theme": []}}}}"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("vendor/composer")).unwrap();
        std::fs::write(
            dir.path().join("vendor/composer/installed.json"),
            r#"{"packages": [{"name": "a/b", "type": "static", "install-path": "../a/b"}]}"#,
        )
        .unwrap();

        let setup =
            CommandSetup::init(&global(Some(dir.path().to_path_buf())), &BufferedLog::new())
                .unwrap();

        assert_eq!(setup.packages.len(), 1);
        assert!(setup.config.static_map.is_some());
        assert_eq!(
            setup.packages.first().unwrap().source_root,
            setup.project_root.join("vendor/a/b")
        );
    }

    #[test]
    fn setup_surfaces_manifest_errors_with_context() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("composer.json"), "42").unwrap();
        let err = CommandSetup::init(&global(Some(dir.path().to_path_buf())), &BufferedLog::new())
            .unwrap_err();
        assert!(format!("{err:#}").starts_with("loading root manifest: Invalid configuration"));
    }
}
