use std::path::Path;

use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, resolve_targets};
use crate::config::packages::{Package, select};
use crate::config::static_map::FileRule;
use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::resources::expand::expand;
use crate::resources::symlink::{LinkOutcome, StaticLink};

/// Counts from one link pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    /// Destinations that now point at their source.
    pub linked: usize,
    /// Rules or links skipped: missing source, occupied destination,
    /// incomplete mapping.
    pub skipped: usize,
    /// Links the OS refused to create.
    pub failed: usize,
}

impl LinkStats {
    const fn absorb(&mut self, other: Self) {
        self.linked += other.linked;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Symlink every mapped static package into its themes.
#[derive(Debug, Clone, Copy)]
pub struct LinkStatics;

impl Task for LinkStatics {
    fn name(&self) -> &str {
        "Link statics"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(stats) = symlink_statics(ctx)? else {
            return Ok(TaskResult::Skipped("no static maps defined".to_string()));
        };
        ctx.log.info(&format!(
            "{} linked, {} skipped, {} failed",
            stats.linked, stats.skipped, stats.failed
        ));
        Ok(TaskResult::Ok)
    }
}

/// Link every selected package into every theme mapped to it.
///
/// Packages are processed in installed order, themes in sorted order and
/// rules in configured order, so a later rule that targets the same
/// destination as an earlier one wins. Returns `None` when no static map
/// is defined.
///
/// # Errors
///
/// Returns an error if a theme directory, a link's parent directory or a
/// stale link cannot be handled.
pub fn symlink_statics(ctx: &Context) -> Result<Option<LinkStats>> {
    let Some((static_map, magento_root)) = resolve_targets(ctx) else {
        return Ok(None);
    };

    let mut stats = LinkStats::default();
    for package in select(&ctx.packages, static_map) {
        let Some(themes) = static_map.themes(&package.name) else {
            continue;
        };
        for (theme, rules) in themes {
            let theme_root = Context::theme_root(&magento_root, &theme.design_path());
            ctx.log.debug(&format!(
                "linking {} into {}",
                package.name,
                theme_root.display()
            ));
            stats.absorb(link_theme(
                package,
                &theme_root,
                rules,
                &*ctx.fs_ops,
                &*ctx.log,
            )?);
        }
    }
    Ok(Some(stats))
}

/// Apply one theme's rules for `package` under `theme_root`.
///
/// Rule and link problems are reported and counted; the remaining rules
/// still run.
///
/// # Errors
///
/// Returns an error if `theme_root` cannot be created or a link fails with
/// an unexpected filesystem error.
pub fn link_theme(
    package: &Package,
    theme_root: &Path,
    rules: &[FileRule],
    fs: &dyn FileSystemOps,
    log: &dyn Log,
) -> Result<LinkStats> {
    let mut stats = LinkStats::default();
    fs.create_dir_all(theme_root)
        .with_context(|| format!("create theme directory: {}", theme_root.display()))?;

    if rules.is_empty() {
        log.error(&format!(
            "{} requires at least one file mapping, has none!",
            package.name
        ));
        stats.skipped += 1;
        return Ok(stats);
    }

    for rule in rules {
        let pairs = match expand(&package.source_root, rule) {
            Ok(pairs) => pairs,
            Err(e) => {
                log.error(&e.to_string());
                stats.skipped += 1;
                continue;
            }
        };

        for pair in pairs {
            let link = StaticLink::new(
                &package.source_root,
                &pair.relative_source,
                theme_root,
                &pair.relative_destination,
            );
            match link.reconcile(fs, log)? {
                LinkOutcome::Linked => stats.linked += 1,
                LinkOutcome::MissingSource | LinkOutcome::NotASymlink => stats.skipped += 1,
                LinkOutcome::LinkCreationFailed => stats.failed += 1,
            }
        }
    }
    Ok(stats)
}
