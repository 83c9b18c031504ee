//! Static asset symlink engine for Magento themes.
//!
//! Keeps a symlinked view of "static" packages inside
//! `app/design/frontend/<Theme>/web`, driven by the `static-map` in the
//! project's `composer.json`, and tears that view down again without touching
//! files it does not own.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse and validate the root manifest and installed packages
//! - **[`resources`]**: idempotent primitives (rule expansion, link reconciliation, tree cleanup)
//! - **[`tasks`]**: named units of work and the lifecycle stages that trigger them
//! - **[`commands`]**: top-level subcommand orchestration (`link`, `clean`, `hook`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod resources;
pub mod tasks;
