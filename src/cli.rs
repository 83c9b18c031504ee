use clap::{Parser, Subcommand};

use crate::tasks::LifecycleStage;

/// Top-level CLI entry point for the statics merger.
#[derive(Parser, Debug)]
#[command(
    name = "statics-merger",
    about = "Symlink static asset packages into Magento theme directories",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Project root containing composer.json (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,

    /// Root manifest to read instead of <root>/composer.json
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Symlink mapped static packages into their themes
    Link,
    /// Remove symlinks and emptied directories from mapped themes
    Clean,
    /// Run the tasks bound to a package-manager lifecycle stage
    Hook(HookOpts),
    /// Print version information
    Version,
}

/// Options for the `hook` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct HookOpts {
    /// Lifecycle stage that fired
    #[arg(value_enum)]
    pub stage: LifecycleStage,
}

impl Command {
    /// Name used for the log file of this invocation.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Clean => "clean",
            Self::Hook(_) => "hook",
            Self::Version => "version",
        }
    }
}
