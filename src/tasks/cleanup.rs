use anyhow::Result;

use super::{Context, Task, TaskResult, resolve_targets};
use crate::config::packages::select;
use crate::resources::tree::{CleanupStats, cleanup};

/// Remove the linked view of every mapped static package.
#[derive(Debug, Clone, Copy)]
pub struct CleanupStatics;

impl Task for CleanupStatics {
    fn name(&self) -> &str {
        "Clean statics"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(stats) = statics_cleanup(ctx) else {
            return Ok(TaskResult::Skipped("no static maps defined".to_string()));
        };
        ctx.log.info(&format!(
            "{} links removed, {} directories removed, {} kept, {} failed",
            stats.links_removed, stats.dirs_removed, stats.kept, stats.failed
        ));
        Ok(TaskResult::Ok)
    }
}

/// Clean the `web` directory of every theme mapped to a selected package.
///
/// Returns `None` when no static map is defined.
pub fn statics_cleanup(ctx: &Context) -> Option<CleanupStats> {
    let (static_map, magento_root) = resolve_targets(ctx)?;

    let mut stats = CleanupStats::default();
    for package in select(&ctx.packages, static_map) {
        let Some(themes) = static_map.themes(&package.name) else {
            continue;
        };
        for theme in themes.keys() {
            let theme_root = Context::theme_root(&magento_root, &theme.design_path());
            ctx.log.debug(&format!(
                "cleaning {} from {}",
                package.name,
                theme_root.display()
            ));
            stats.absorb(cleanup(&theme_root, &package.name, &*ctx.fs_ops, &*ctx.log));
        }
    }
    Some(stats)
}
