//! Record layout shared by every string-backed medium.
//!
//! A record is one line of `"; "`-joined segments: the value segment
//! `<name>=<urlencoded json>`, then the metadata segments
//! `expires=<RFC-1123 stamp>` and `path=<scope>`. This layout is the
//! bit-exact contract of the crate; media read and write it unchanged
//! and anything else about persistence is up to the medium.

use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::StoreError;

/// Joined between segments when a record is built.
pub const SEGMENT_SEPARATOR: &str = "; ";

/// Key of the expiry metadata segment.
pub const EXPIRES_KEY: &str = "expires";

/// Key of the scope metadata segment.
pub const PATH_KEY: &str = "path";

/// RFC-1123 layout of expiry stamps, e.g. `Fri, 13 Feb 2009 23:31:30 GMT`.
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Everything except ASCII alphanumerics and `-_.!~*'()` is escaped,
/// which keeps encoded values byte-compatible with records written by
/// `encodeURIComponent`-style producers.
const VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a serialized value for embedding in a segment.
pub fn encode_value(raw: &str) -> String {
    utf8_percent_encode(raw, VALUE_ENCODE_SET).to_string()
}

/// Reverse of [`encode_value`]. Escapes that decode to invalid UTF-8 are
/// reported as decode failures.
pub fn decode_value(encoded: &str) -> Result<String, StoreError> {
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| StoreError::Decode(format!("value is not valid UTF-8: {e}")))
}

/// Render an expiry instant in the stamp layout records carry.
pub fn format_expires(expires_at: DateTime<Utc>) -> String {
    expires_at.format(EXPIRES_FORMAT).to_string()
}

/// Parse a stamp previously rendered by [`format_expires`].
pub fn parse_expires(stamp: &str) -> Result<DateTime<Utc>, StoreError> {
    NaiveDateTime::parse_from_str(stamp, EXPIRES_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Decode(format!("bad expires stamp {stamp:?}: {e}")))
}

/// Assemble the full record string for one value.
pub fn build_record(
    name: &str,
    encoded_value: &str,
    expires_at: DateTime<Utc>,
    path_scope: &str,
) -> String {
    [
        format!("{name}={encoded_value}"),
        format!("{EXPIRES_KEY}={}", format_expires(expires_at)),
        format!("{PATH_KEY}={path_scope}"),
    ]
    .join(SEGMENT_SEPARATOR)
}

fn segment_value<'a>(candidate: &'a str, key: &str) -> Option<&'a str> {
    candidate.strip_prefix(key).and_then(|rest| rest.strip_prefix('='))
}

/// Scan a raw backing string for the first segment keyed by `name`.
///
/// Candidates are `';'`-separated; leading whitespace is trimmed before
/// the key comparison. The earliest match wins, so duplicated keys read
/// deterministically no matter how the duplicates got there.
pub fn find_segment<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    raw.split(';')
        .map(str::trim_start)
        .find_map(|candidate| segment_value(candidate, name))
}

/// Scan for the record keyed by `name`: its value segment plus the
/// expiry stamp from the metadata run directly following it.
///
/// Metadata belongs to the value segment it trails, so a raw string
/// holding several records pairs each value with its own stamp. The run
/// ends at the next value segment or at the end of the string.
pub fn find_record<'a>(raw: &'a str, name: &str) -> Option<(&'a str, Option<&'a str>)> {
    let mut segments = raw.split(';').map(str::trim_start);
    let value = segments.find_map(|candidate| segment_value(candidate, name))?;

    let mut stamp = None;
    for candidate in segments {
        if let Some(found) = segment_value(candidate, EXPIRES_KEY) {
            if stamp.is_none() {
                stamp = Some(found);
            }
        } else if segment_value(candidate, PATH_KEY).is_none() {
            break;
        }
    }
    Some((value, stamp))
}

/// Whether the stamp belonging to `name`'s record lies at or before `now`.
///
/// A record without a stamp of its own never expires. A stamp that does
/// not parse is a decode failure rather than silent acceptance.
pub fn record_expired(raw: &str, name: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
    match find_record(raw, name) {
        Some((_, Some(stamp))) => Ok(parse_expires(stamp)? <= now),
        _ => Ok(false),
    }
}

/// Serialize a value to the JSON form records embed.
pub fn to_json<T: Serialize>(data: &T) -> Result<String, StoreError> {
    serde_json::to_string(data).map_err(StoreError::from)
}

/// Parse a value back out of its JSON form.
pub fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(StoreError::from)
}

/// Serialize, escape and frame one value as a complete record.
pub fn write_record<T: Serialize>(
    name: &str,
    data: &T,
    expires_at: DateTime<Utc>,
    path_scope: &str,
) -> Result<String, StoreError> {
    let json = to_json(data)?;
    Ok(build_record(name, &encode_value(&json), expires_at, path_scope))
}

/// Locate and decode the record for `name` inside a raw backing string.
///
/// `Ok(None)` when no segment matches, or when `enforce_expiry` is on and
/// the record's own stamp lies at or before `now`. Expiry is checked
/// before the value is decoded, so a stale record reads as absent even
/// when its value is corrupt.
pub fn read_record<T: DeserializeOwned>(
    raw: &str,
    name: &str,
    enforce_expiry: bool,
    now: DateTime<Utc>,
) -> Result<Option<T>, StoreError> {
    let Some((encoded, stamp)) = find_record(raw, name) else {
        return Ok(None);
    };
    if enforce_expiry {
        if let Some(stamp) = stamp {
            if parse_expires(stamp)? <= now {
                return Ok(None);
            }
        }
    }
    let json = decode_value(encoded)?;
    Ok(Some(from_json(&json)?))
}
