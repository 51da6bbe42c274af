use thiserror::Error;

/// Failures surfaced by storage capabilities and their media
///
/// Absence is not listed here on purpose: a fetch that finds nothing
/// returns `Ok(None)`, never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence medium cannot serve the request at all
    /// (disabled jar, poisoned lock, filesystem failure, retention
    /// past the representable expiry range).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// A stored value could not be serialized or parsed back.
    #[error("decode error: {0}")]
    Decode(String),
    /// The store name would corrupt the record format.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
}

impl StoreError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            StoreError::InvalidHandle(_) => 2001,
            StoreError::Unavailable(_) => 2101,
            StoreError::Decode(_) => 2102,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable(reason.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}
