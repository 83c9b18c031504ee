//! Report sink: structured console and file output.

mod buffered;
mod logger;
mod subscriber;
mod types;
mod utils;

pub use buffered::BufferedLog;
pub use logger::Logger;
pub use subscriber::init_subscriber;
#[cfg(test)]
pub use types::MockLog;
pub use types::{Level, Log, TaskEntry, TaskStatus};
