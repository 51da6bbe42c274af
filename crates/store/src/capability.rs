use std::sync::Arc;

use crate::errors::StoreError;

/// Storage capability high-level consumers depend on.
///
/// One implementation per persistence medium. `save` replaces whatever
/// the medium holds for this store with `data`; `fetch` returns the most
/// recently saved value. A store that has never been written reads as
/// `Ok(None)`, which is a normal outcome and never an error.
pub trait Storage<T>: Send + Sync {
    fn save(&self, data: &T) -> Result<(), StoreError>;
    fn fetch(&self) -> Result<Option<T>, StoreError>;
}

impl<T, S: Storage<T> + ?Sized> Storage<T> for &S {
    fn save(&self, data: &T) -> Result<(), StoreError> {
        (**self).save(data)
    }

    fn fetch(&self) -> Result<Option<T>, StoreError> {
        (**self).fetch()
    }
}

impl<T, S: Storage<T> + ?Sized> Storage<T> for Box<S> {
    fn save(&self, data: &T) -> Result<(), StoreError> {
        (**self).save(data)
    }

    fn fetch(&self) -> Result<Option<T>, StoreError> {
        (**self).fetch()
    }
}

impl<T, S: Storage<T> + ?Sized> Storage<T> for Arc<S> {
    fn save(&self, data: &T) -> Result<(), StoreError> {
        (**self).save(data)
    }

    fn fetch(&self) -> Result<Option<T>, StoreError> {
        (**self).fetch()
    }
}

/// Simple in-memory mock storage for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    use crate::codec;

    /// Single-slot storage that keeps the serialized value in memory.
    ///
    /// Built in failing mode it rejects every call as unavailable, which
    /// is enough to exercise a consumer's error paths without a real
    /// medium misbehaving on cue.
    #[derive(Default)]
    pub struct MockStorage {
        slot: Mutex<Option<String>>,
        failing: bool,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                slot: Mutex::new(None),
                failing: true,
            }
        }
    }

    impl<T: Serialize + DeserializeOwned> Storage<T> for MockStorage {
        fn save(&self, data: &T) -> Result<(), StoreError> {
            if self.failing {
                return Err(StoreError::unavailable("mock storage set to fail"));
            }
            let json = codec::to_json(data)?;
            *self.slot.lock().unwrap() = Some(json);
            Ok(())
        }

        fn fetch(&self) -> Result<Option<T>, StoreError> {
            if self.failing {
                return Err(StoreError::unavailable("mock storage set to fail"));
            }
            let slot = self.slot.lock().unwrap();
            slot.as_deref().map(codec::from_json).transpose()
        }
    }
}
