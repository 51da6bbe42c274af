use std::marker::PhantomData;

use crate::capability::Storage;
use crate::errors::StoreError;

/// A [`KeyedStore`] whose medium is chosen at runtime.
pub type DynKeyedStore<T> = KeyedStore<T, Box<dyn Storage<T>>>;

/// High-level consumer bound to the storage capability, never to a
/// concrete medium.
///
/// Construction takes any [`Storage`] implementation; `save` and `fetch`
/// delegate unchanged. Swapping the medium is a construction-site change
/// and this type never needs to know.
///
/// # Examples
/// ```
/// use serde::{Deserialize, Serialize};
/// use store::backend::MemoryBackend;
/// use store::{Handle, KeyedStore};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct ProfileData {
///     name: String,
///     age: u32,
/// }
///
/// let prof = KeyedStore::new(MemoryBackend::new(Handle::new("profile")?));
/// prof.save(&ProfileData { name: "Joe".into(), age: 10 })?;
/// let joe = prof.fetch()?;
/// assert_eq!(joe, Some(ProfileData { name: "Joe".into(), age: 10 }));
/// # Ok::<(), store::StoreError>(())
/// ```
pub struct KeyedStore<T, S: Storage<T>> {
    storage: S,
    _value: PhantomData<fn() -> T>,
}

impl<T, S: Storage<T>> KeyedStore<T, S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            _value: PhantomData,
        }
    }

    /// Replace the stored value with `data`.
    pub fn save(&self, data: &T) -> Result<(), StoreError> {
        self.storage.save(data)
    }

    /// The most recently saved value, or `Ok(None)` before the first save.
    pub fn fetch(&self) -> Result<Option<T>, StoreError> {
        self.storage.fetch()
    }

    /// Hand the injected capability back, e.g. to rewire it elsewhere.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<T> KeyedStore<T, Box<dyn Storage<T>>> {
    /// Erase the medium's type so it can be picked at runtime.
    pub fn boxed(storage: impl Storage<T> + 'static) -> Self {
        KeyedStore::new(Box::new(storage))
    }
}
