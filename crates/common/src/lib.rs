//! Shared building blocks for the server and its binaries.

pub mod types;
pub mod utils;
pub mod env;
