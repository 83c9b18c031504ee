//! Named tasks run against a shared [`Context`], and the lifecycle stages
//! that trigger them.
pub mod cleanup;
mod context;
pub mod link;

pub use context::{Context, FRONTEND_DESIGN_DIR};

use std::path::PathBuf;

use anyhow::Result;

use crate::config::static_map::StaticMap;
use crate::logging::TaskStatus;

/// Result of a task that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// The task ran to completion.
    Ok,
    /// The task had nothing to do.
    Skipped(String),
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error on an unexpected filesystem failure. Problems with
    /// individual rules, links or entries are reported, not returned.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Host package-manager events the tool hooks into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LifecycleStage {
    /// Before packages are installed.
    PreInstallCmd,
    /// Before packages are updated.
    PreUpdateCmd,
    /// After packages are installed.
    PostInstallCmd,
    /// After packages are updated.
    PostUpdateCmd,
}

impl LifecycleStage {
    /// Every stage, in the order the host fires them.
    pub const ALL: [Self; 4] = [
        Self::PreInstallCmd,
        Self::PreUpdateCmd,
        Self::PostInstallCmd,
        Self::PostUpdateCmd,
    ];

    /// Event name as the host spells it.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::PreInstallCmd => "pre-install-cmd",
            Self::PreUpdateCmd => "pre-update-cmd",
            Self::PostInstallCmd => "post-install-cmd",
            Self::PostUpdateCmd => "post-update-cmd",
        }
    }
}

/// Tasks triggered by `stage`, in run order.
///
/// Pre-stages tear the linked view down so the package manager never writes
/// through a symlink; post-stages rebuild it.
#[must_use]
pub fn tasks_for_stage(stage: LifecycleStage) -> Vec<Box<dyn Task>> {
    match stage {
        LifecycleStage::PreInstallCmd | LifecycleStage::PreUpdateCmd => {
            vec![Box::new(cleanup::CleanupStatics)]
        }
        LifecycleStage::PostInstallCmd | LifecycleStage::PostUpdateCmd => {
            vec![Box::new(link::LinkStatics)]
        }
    }
}

/// The static map and Magento root a pass works against.
///
/// Reports and returns `None` when no static map is defined; no filesystem
/// work may happen in that case.
fn resolve_targets(ctx: &Context) -> Option<(&StaticMap, PathBuf)> {
    let Some(static_map) = ctx.config.static_map.as_ref() else {
        ctx.log.info("No static maps defined");
        return None;
    };
    if ctx.config.magento_root_dir.is_none() {
        ctx.log
            .info("Magento root dir not defined, assumed current working directory");
    }
    Some((static_map, ctx.magento_root()))
}

/// Execute a task, recording the result in the logger.
///
/// Returns `false` if the task failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> bool {
    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            true
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.debug(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(reason));
            true
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(format!("{e:#}")));
            false
        }
    }
}
