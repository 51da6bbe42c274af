use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use configs::StoreConfig;

use crate::backend::cookie::DEFAULT_RETENTION_DAYS;
use crate::capability::Storage;
use crate::codec;
use crate::errors::StoreError;
use crate::handle::Handle;

/// File-persisted medium holding one record string.
///
/// Writes exactly the string a [`CookieJar`](crate::CookieJar) would
/// hold, so a record file survives process restarts and stays readable
/// by anything that speaks the segment layout. A missing file reads as
/// never-saved; every other filesystem failure means the medium is
/// unavailable.
pub struct FileBackend<T> {
    name: Handle,
    path: PathBuf,
    retention: Duration,
    path_scope: String,
    enforce_expiry: bool,
    _value: PhantomData<fn() -> T>,
}

impl<T> FileBackend<T> {
    /// Backend with the default retention window and `/` scope.
    pub fn new(name: Handle, path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            path: path.into(),
            retention: Duration::days(i64::from(DEFAULT_RETENTION_DAYS)),
            path_scope: "/".to_string(),
            enforce_expiry: false,
            _value: PhantomData,
        }
    }

    /// Backend with retention, scope and expiry policy taken from config.
    pub fn with_config(name: Handle, path: impl Into<PathBuf>, cfg: &StoreConfig) -> Self {
        Self {
            name,
            path: path.into(),
            retention: Duration::days(i64::from(cfg.retention_days)),
            path_scope: cfg.path_scope.clone(),
            enforce_expiry: cfg.enforce_expiry,
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize + DeserializeOwned> Storage<T> for FileBackend<T> {
    #[instrument(skip(self, data), fields(handle = %self.name, path = %self.path.display()))]
    fn save(&self, data: &T) -> Result<(), StoreError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.retention)
            .ok_or_else(|| StoreError::unavailable("retention window exceeds the expiry range"))?;
        let record = codec::write_record(self.name.as_str(), data, expires_at, &self.path_scope)?;

        common::env::ensure_parent_dir(&self.path)
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        std::fs::write(&self.path, record)
            .map_err(|e| StoreError::unavailable(format!("write {}: {e}", self.path.display())))?;
        debug!("record file written");
        Ok(())
    }

    #[instrument(skip(self), fields(handle = %self.name, path = %self.path.display()))]
    fn fetch(&self) -> Result<Option<T>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("record file does not exist yet");
                return Ok(None);
            }
            Err(e) => {
                return Err(StoreError::unavailable(format!(
                    "read {}: {e}",
                    self.path.display()
                )))
            }
        };
        codec::read_record(&raw, self.name.as_str(), self.enforce_expiry, Utc::now())
    }
}
