use std::fmt;

use crate::codec;
use crate::errors::StoreError;

/// Validated name of one logical store, e.g. `profile`.
///
/// The name becomes the key of the stored record, so anything that would
/// break the segment layout is rejected up front: names must be non-empty
/// ASCII without `;`, `=`, whitespace or control characters, and must not
/// collide with the reserved metadata keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(StoreError::InvalidHandle("name must not be empty".into()));
        }
        if name == codec::EXPIRES_KEY || name == codec::PATH_KEY {
            return Err(StoreError::InvalidHandle(format!(
                "name {name:?} is a reserved metadata key"
            )));
        }
        if let Some(bad) = name.chars().find(|c| {
            !c.is_ascii() || c.is_ascii_whitespace() || c.is_ascii_control() || *c == ';' || *c == '='
        }) {
            return Err(StoreError::InvalidHandle(format!(
                "name {name:?} contains forbidden character {bad:?}"
            )));
        }
        Ok(Handle(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Handle {
    type Error = StoreError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Handle::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        for name in ["profile", "session-token", "cart_v2", "a"] {
            assert!(Handle::new(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_names_that_break_the_record_layout() {
        for name in ["", "a=b", "a;b", "with space", "tab\tname", "caf\u{e9}"] {
            let err = Handle::new(name).unwrap_err();
            assert!(matches!(err, StoreError::InvalidHandle(_)), "{name:?}");
        }
    }

    #[test]
    fn rejects_reserved_metadata_keys() {
        assert!(Handle::new("expires").is_err());
        assert!(Handle::new("path").is_err());
        // prefix collisions are fine, only exact keys are reserved
        assert!(Handle::new("expires_at").is_ok());
    }

    #[test]
    fn displays_as_bare_name() {
        let handle = Handle::new("profile").unwrap();
        assert_eq!(handle.to_string(), "profile");
        assert_eq!(handle.as_str(), "profile");
    }

    #[test]
    fn converts_from_str_with_the_same_rules() {
        let handle = Handle::try_from("profile").unwrap();
        assert_eq!(handle.as_str(), "profile");
        assert!(Handle::try_from("a=b").is_err());
    }
}
