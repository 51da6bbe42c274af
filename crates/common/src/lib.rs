//! Shared helpers for the keyed-store workspace.
//! - Logging initialization used by tests and downstream binaries.
//! - Small filesystem/environment checks shared by file-backed media.

pub mod env;
pub mod utils;
