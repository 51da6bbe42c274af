use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::errors::StoreError;

/// Shared backing string in the browser cookie-jar style.
///
/// Holds one raw record string; writers replace the whole string in a
/// single operation and readers take a consistent snapshot. Clones share
/// the same string, so a jar handed to several backends behaves like one
/// medium. A disabled jar models a context without persistence: reads see
/// an empty string and writes are rejected as unavailable.
#[derive(Clone, Debug)]
pub struct CookieJar {
    inner: Arc<RwLock<String>>,
    enabled: bool,
}

impl CookieJar {
    /// An empty, writable jar.
    pub fn new() -> Self {
        Self::with_contents(String::new())
    }

    /// Attach to an existing raw string, e.g. one written in an earlier run.
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(raw.into())),
            enabled: true,
        }
    }

    /// A jar that refuses writes, like an environment with cookies turned off.
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(RwLock::new(String::new())),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Snapshot of the raw string. A disabled jar always reads empty.
    pub fn read_raw(&self) -> Result<String, StoreError> {
        if !self.enabled {
            return Ok(String::new());
        }
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::unavailable("backing string lock poisoned"))?;
        Ok(guard.clone())
    }

    /// Replace the whole raw string in one operation.
    pub fn replace_raw(&self, raw: String) -> Result<(), StoreError> {
        if !self.enabled {
            warn!("write to disabled jar rejected");
            return Err(StoreError::unavailable("jar is disabled"));
        }
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::unavailable("backing string lock poisoned"))?;
        debug!(bytes = raw.len(), "jar contents replaced");
        *guard = raw;
        Ok(())
    }

    /// Drop everything the jar holds.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.replace_raw(String::new())
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}
