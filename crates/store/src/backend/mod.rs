//! Persistence media implementing the [`Storage`](crate::Storage) capability.
//!
//! - [`CookieBackend`]: reference string-backed medium over a [`CookieJar`](crate::CookieJar)
//! - [`MemoryBackend`]: shared in-memory map, no expiry
//! - [`CacheBackend`]: in-memory medium that enforces a retention window itself
//! - [`FileBackend`]: the record string persisted to a file

pub mod cache;
pub mod cookie;
pub mod file;
pub mod memory;

pub use cache::CacheBackend;
pub use cookie::{CookieBackend, DEFAULT_RETENTION_DAYS};
pub use file::FileBackend;
pub use memory::MemoryBackend;
