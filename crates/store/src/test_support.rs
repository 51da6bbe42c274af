#![cfg(test)]

//! Shared helpers for unit and integration tests.

use std::path::PathBuf;

use once_cell::sync::OnceCell;

static LOGGING: OnceCell<()> = OnceCell::new();

/// Initialize logging once per test process; later calls are no-ops.
pub fn init_test_logging() {
    LOGGING.get_or_init(|| {
        common::utils::logging::init_logging_default();
    });
}

/// Path for a throwaway record file unique to one test run.
pub fn temp_store_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}.jar", uuid::Uuid::new_v4()))
}
