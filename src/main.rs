use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use statics_merger::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let command = args.command.log_name();
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    match &args.command {
        cli::Command::Link => commands::link::run(&args.global, &log),
        cli::Command::Clean => commands::clean::run(&args.global, &log),
        cli::Command::Hook(opts) => commands::hook::run(&args.global, opts, &log),
        cli::Command::Version => Ok(()),
    }
}
