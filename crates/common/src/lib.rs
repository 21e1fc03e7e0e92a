//! Shared helpers used by every crate in the workspace: tracing setup and
//! small wire types.

pub mod types;
pub mod utils;
