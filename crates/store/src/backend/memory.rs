use std::marker::PhantomData;
use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::capability::Storage;
use crate::codec;
use crate::errors::StoreError;
use crate::handle::Handle;

/// Shared in-memory map used as a medium by [`MemoryBackend`].
pub type MemoryMedium = Arc<DashMap<String, String>>;

/// In-memory map medium keyed by handle name.
///
/// Values live as serialized JSON under their handle name; backends
/// attached to the same medium see each other's writes. There is no
/// escaping layer here because the map never joins values into one
/// string, and there is no expiry support at all.
pub struct MemoryBackend<T> {
    name: Handle,
    entries: MemoryMedium,
    _value: PhantomData<fn() -> T>,
}

impl<T> MemoryBackend<T> {
    /// Backend over its own fresh map.
    pub fn new(name: Handle) -> Self {
        Self::with_medium(name, Arc::new(DashMap::new()))
    }

    /// Attach to an existing map so several handles share one medium.
    pub fn with_medium(name: Handle, entries: MemoryMedium) -> Self {
        Self {
            name,
            entries,
            _value: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Storage<T> for MemoryBackend<T> {
    fn save(&self, data: &T) -> Result<(), StoreError> {
        let json = codec::to_json(data)?;
        self.entries.insert(self.name.as_str().to_string(), json);
        Ok(())
    }

    fn fetch(&self) -> Result<Option<T>, StoreError> {
        match self.entries.get(self.name.as_str()) {
            Some(json) => Ok(Some(codec::from_json(json.value())?)),
            None => Ok(None),
        }
    }
}
