//! Keyed persistence behind a pluggable storage capability.
//! - High-level consumers depend on the [`Storage`] capability, never on
//!   a concrete medium.
//! - Ships a cookie-jar style string medium as the reference backend,
//!   plus in-memory, TTL-cache and file media behind the same capability.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod handle;
pub mod codec;
pub mod jar;
pub mod capability;
pub mod keyed;
pub mod backend;
#[cfg(test)]
pub mod test_support;

pub use capability::Storage;
pub use errors::StoreError;
pub use handle::Handle;
pub use jar::CookieJar;
pub use keyed::{DynKeyedStore, KeyedStore};
