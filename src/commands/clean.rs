//! Clean command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::cleanup::CleanupStatics;

/// Run the clean command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or the cleanup task fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = super::CommandRunner::new(global, log)?;
    runner.run([&CleanupStatics as &dyn Task])
}
