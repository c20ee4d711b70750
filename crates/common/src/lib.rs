//! Helpers shared by every crate of the workspace: logging setup and small
//! response types.

pub mod types;
pub mod utils;
