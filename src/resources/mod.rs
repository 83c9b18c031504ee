//! Idempotent filesystem primitives (check + apply pattern).
//!
//! [`expand`] turns one file rule into concrete path pairs, [`symlink`]
//! reconciles a single pair against the destination tree and [`tree`]
//! removes what the link pass created.
pub mod expand;
pub mod symlink;
pub mod tree;
