//! CLI command implementations.

pub mod list_kinds;
pub mod run;
