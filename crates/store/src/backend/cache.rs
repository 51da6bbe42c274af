use std::marker::PhantomData;
use std::time::Duration;

use moka::sync::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;

use configs::StoreConfig;

use crate::capability::Storage;
use crate::codec;
use crate::errors::StoreError;
use crate::handle::Handle;

const DEFAULT_CACHE_CAPACITY: u64 = 1024;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// In-memory medium whose retention window the medium itself enforces.
///
/// The backing cache evicts entries once `time_to_live` has passed, so a
/// fetch after the window reads as absent without any expiry logic in
/// this crate. The counterpart to the advisory stamps string-backed
/// media carry.
pub struct CacheBackend<T> {
    name: Handle,
    cache: Cache<String, String>,
    _value: PhantomData<fn() -> T>,
}

impl<T> CacheBackend<T> {
    /// Backend over a fresh cache with the given retention window.
    pub fn new(name: Handle, time_to_live: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(DEFAULT_CACHE_CAPACITY)
            .time_to_live(time_to_live)
            .build();
        Self::with_medium(name, cache)
    }

    /// Backend whose retention window comes from config, in days.
    pub fn with_config(name: Handle, cfg: &StoreConfig) -> Self {
        Self::new(
            name,
            Duration::from_secs(u64::from(cfg.retention_days) * SECONDS_PER_DAY),
        )
    }

    /// Attach to an existing cache so several handles share one medium.
    pub fn with_medium(name: Handle, cache: Cache<String, String>) -> Self {
        Self {
            name,
            cache,
            _value: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Storage<T> for CacheBackend<T> {
    fn save(&self, data: &T) -> Result<(), StoreError> {
        let json = codec::to_json(data)?;
        self.cache.insert(self.name.as_str().to_string(), json);
        Ok(())
    }

    fn fetch(&self) -> Result<Option<T>, StoreError> {
        match self.cache.get(self.name.as_str()) {
            Some(json) => Ok(Some(codec::from_json(&json)?)),
            None => Ok(None),
        }
    }
}
