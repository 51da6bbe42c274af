use std::marker::PhantomData;

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use configs::StoreConfig;

use crate::capability::Storage;
use crate::codec;
use crate::errors::StoreError;
use crate::handle::Handle;
use crate::jar::CookieJar;

/// Days a record is stamped to live when no configuration overrides it.
pub const DEFAULT_RETENTION_DAYS: u32 = configs::DEFAULT_RETENTION_DAYS;

/// Reference string-backed medium: one record kept in a [`CookieJar`].
///
/// `save` serializes the value, escapes it and replaces the jar's whole
/// string with `<name>=<value>; expires=<stamp>; path=<scope>`. `fetch`
/// scans the string for the first segment keyed by the handle name.
///
/// Known limitation: the expiry stamp is advisory metadata for the
/// medium. This backend only honors it when `enforce_expiry` is turned
/// on, which keeps reloads of an aged jar readable by default.
pub struct CookieBackend<T> {
    name: Handle,
    jar: CookieJar,
    retention: Duration,
    path_scope: String,
    enforce_expiry: bool,
    _value: PhantomData<fn() -> T>,
}

impl<T> CookieBackend<T> {
    /// Backend with the default retention window and `/` scope.
    pub fn new(name: Handle, jar: CookieJar) -> Self {
        Self {
            name,
            jar,
            retention: Duration::days(i64::from(DEFAULT_RETENTION_DAYS)),
            path_scope: "/".to_string(),
            enforce_expiry: false,
            _value: PhantomData,
        }
    }

    /// Backend with retention, scope and expiry policy taken from config.
    pub fn with_config(name: Handle, jar: CookieJar, cfg: &StoreConfig) -> Self {
        Self {
            name,
            jar,
            retention: Duration::days(i64::from(cfg.retention_days)),
            path_scope: cfg.path_scope.clone(),
            enforce_expiry: cfg.enforce_expiry,
            _value: PhantomData,
        }
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }
}

impl<T: Serialize + DeserializeOwned> Storage<T> for CookieBackend<T> {
    #[instrument(skip(self, data), fields(handle = %self.name))]
    fn save(&self, data: &T) -> Result<(), StoreError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.retention)
            .ok_or_else(|| StoreError::unavailable("retention window exceeds the expiry range"))?;
        let record = codec::write_record(self.name.as_str(), data, expires_at, &self.path_scope)?;
        self.jar.replace_raw(record)?;
        debug!("record saved");
        Ok(())
    }

    #[instrument(skip(self), fields(handle = %self.name))]
    fn fetch(&self) -> Result<Option<T>, StoreError> {
        let raw = self.jar.read_raw()?;
        let found = codec::read_record(&raw, self.name.as_str(), self.enforce_expiry, Utc::now())?;
        if found.is_none() {
            debug!("no live record for handle");
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct ProfileData {
        name: String,
        age: u32,
    }

    fn joe() -> ProfileData {
        ProfileData {
            name: "Joe".into(),
            age: 10,
        }
    }

    fn backend(jar: CookieJar) -> CookieBackend<ProfileData> {
        CookieBackend::new(Handle::new("profile").unwrap(), jar)
    }

    #[test]
    fn fresh_jar_reads_as_absent() {
        test_support::init_test_logging();
        let store = backend(CookieJar::new());
        assert_eq!(store.fetch().unwrap(), None);
    }

    #[test]
    fn save_then_fetch_round_trips() {
        let store = backend(CookieJar::new());
        store.save(&joe()).unwrap();
        assert_eq!(store.fetch().unwrap(), Some(joe()));
    }

    #[test]
    fn save_writes_the_documented_layout() {
        let jar = CookieJar::new();
        let store = backend(jar.clone());
        store.save(&joe()).unwrap();

        let raw = jar.read_raw().unwrap();
        assert!(raw.starts_with("profile=%7B%22name%22%3A%22Joe%22%2C%22age%22%3A10%7D"));
        assert!(raw.contains("; expires="));
        assert!(raw.ends_with("; path=/"));

        let stamp = codec::find_segment(&raw, codec::EXPIRES_KEY).unwrap();
        let expires_at = codec::parse_expires(stamp).unwrap();
        let lifetime = expires_at - Utc::now();
        assert!(lifetime > Duration::days(89) && lifetime <= Duration::days(90));
    }

    #[test]
    fn overwrite_replaces_the_previous_record() {
        let jar = CookieJar::new();
        let store = backend(jar.clone());
        store.save(&joe()).unwrap();
        store
            .save(&ProfileData {
                name: "Joe".into(),
                age: 11,
            })
            .unwrap();

        assert_eq!(store.fetch().unwrap().unwrap().age, 11);
        // whole-string replace leaves exactly one value segment behind
        let raw = jar.read_raw().unwrap();
        assert_eq!(raw.matches("profile=").count(), 1);
    }

    #[test]
    fn duplicate_keys_read_the_first_segment_every_time() {
        let jar = CookieJar::with_contents(
            "profile=%7B%22name%22%3A%22Joe%22%2C%22age%22%3A10%7D; \
             profile=%7B%22name%22%3A%22Joe%22%2C%22age%22%3A99%7D; path=/",
        );
        let store = backend(jar);
        for _ in 0..3 {
            assert_eq!(store.fetch().unwrap().unwrap().age, 10);
        }
    }

    #[test]
    fn disabled_jar_rejects_saves_and_reads_absent() {
        let store = backend(CookieJar::disabled());
        let err = store.save(&joe()).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.fetch().unwrap(), None);
    }

    #[test]
    fn unrepresentable_expiry_fails_save_cleanly() {
        // an unvalidated config can carry a retention no stamp can hold
        let cfg = StoreConfig {
            retention_days: u32::MAX,
            ..StoreConfig::default()
        };
        let jar = CookieJar::new();
        let store = CookieBackend::<ProfileData>::with_config(
            Handle::new("profile").unwrap(),
            jar.clone(),
            &cfg,
        );

        let err = store.save(&joe()).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(jar.read_raw().unwrap(), "");
    }

    #[test]
    fn corrupt_value_is_a_decode_error() {
        let store = backend(CookieJar::with_contents("profile=%FF; path=/"));
        let err = store.fetch().unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn stale_records_survive_unless_enforcement_is_on() {
        let stamp = codec::format_expires(Utc::now() - Duration::days(1));
        let raw = format!(
            "profile=%7B%22name%22%3A%22Joe%22%2C%22age%22%3A10%7D; expires={stamp}; path=/"
        );

        let lenient = backend(CookieJar::with_contents(raw.clone()));
        assert_eq!(lenient.fetch().unwrap(), Some(joe()));

        let cfg = StoreConfig {
            enforce_expiry: true,
            ..StoreConfig::default()
        };
        let strict = CookieBackend::<ProfileData>::with_config(
            Handle::new("profile").unwrap(),
            CookieJar::with_contents(raw),
            &cfg,
        );
        assert_eq!(strict.fetch().unwrap(), None);
    }

    #[test]
    fn enforcement_reads_the_records_own_stamp() {
        let past = codec::format_expires(Utc::now() - Duration::days(1));
        let future = codec::format_expires(Utc::now() + Duration::days(1));
        // a seeded string can hold several records, each with its own stamp
        let raw = format!(
            "stale=%7B%22name%22%3A%22Old%22%2C%22age%22%3A1%7D; expires={past}; path=/; \
             profile=%7B%22name%22%3A%22Joe%22%2C%22age%22%3A10%7D; expires={future}; path=/"
        );

        let cfg = StoreConfig {
            enforce_expiry: true,
            ..StoreConfig::default()
        };
        let strict = CookieBackend::<ProfileData>::with_config(
            Handle::new("profile").unwrap(),
            CookieJar::with_contents(raw),
            &cfg,
        );
        assert_eq!(strict.fetch().unwrap(), Some(joe()));
    }

    #[test]
    fn config_drives_retention_and_scope() {
        let jar = CookieJar::new();
        let cfg = StoreConfig {
            retention_days: 7,
            path_scope: "/app".into(),
            enforce_expiry: false,
        };
        let store = CookieBackend::<ProfileData>::with_config(
            Handle::new("profile").unwrap(),
            jar.clone(),
            &cfg,
        );
        store.save(&joe()).unwrap();

        let raw = jar.read_raw().unwrap();
        assert!(raw.ends_with("; path=/app"));
        let stamp = codec::find_segment(&raw, codec::EXPIRES_KEY).unwrap();
        let lifetime = codec::parse_expires(stamp).unwrap() - Utc::now();
        assert!(lifetime > Duration::days(6) && lifetime <= Duration::days(7));
    }
}
