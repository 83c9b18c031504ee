//! Hook command: run the tasks bound to a package-manager lifecycle stage.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{GlobalOpts, HookOpts};
use crate::logging::Logger;
use crate::tasks;

/// Run the tasks for `opts.stage`.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any task fails.
pub fn run(global: &GlobalOpts, opts: &HookOpts, log: &Arc<Logger>) -> Result<()> {
    log.debug(&format!("lifecycle stage: {}", opts.stage.event_name()));
    let runner = super::CommandRunner::new(global, log)?;
    let tasks = tasks::tasks_for_stage(opts.stage);
    runner.run(tasks.iter().map(Box::as_ref))
}
