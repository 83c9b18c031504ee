//! Link command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::link::LinkStatics;

/// Run the link command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or the link task fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = super::CommandRunner::new(global, log)?;
    runner.run([&LinkStatics as &dyn Task])
}
