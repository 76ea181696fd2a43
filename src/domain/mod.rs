//! Domain types for todos and user accounts.
//!
//! Identifiers are 12-byte object ids rendered as 24 lowercase hex characters.
//! The newtype keeps parsed ids apart from arbitrary path strings, so anything
//! that reaches a repository has already passed the format check.

pub mod todo;
pub mod user;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

pub use todo::{Todo, TodoPatch, completion_timestamp, normalize_text};
pub use user::{AUTH_ACCESS, AuthToken, TokenList, User, normalize_email};

/// Length of an object id in its hex form.
pub const OBJECT_ID_LEN: usize = 24;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(rand::random);

/// Upper bound of the random counter start. The 24-bit counter then has at
/// least 12M increments of headroom before it wraps within one second.
const COUNTER_SEED_MASK: u32 = 0x003f_ffff;

static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| AtomicU32::new(counter_seed()));

fn counter_seed() -> u32 {
    rand::random::<u32>() & COUNTER_SEED_MASK
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id: {0:?}")]
pub struct InvalidObjectId(pub String);

/// Unique identifier for a stored todo or user.
///
/// Layout: 4-byte big-endian seconds since the epoch, 5 bytes unique to the
/// process, 3-byte counter. Ids generated by one process therefore sort in
/// creation order.
///
/// ```rust
/// use todo_api::domain::ObjectId;
///
/// let id = ObjectId::new();
/// assert_eq!(id.as_str().len(), 24);
/// assert!(ObjectId::parse("123abc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    #[must_use]
    pub fn new() -> Self {
        let secs = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        Self(hex_encode(&bytes))
    }

    /// Accepts exactly 24 hex digits in either case; the stored form is lowercase.
    pub fn parse(raw: &str) -> Result<Self, InvalidObjectId> {
        if Self::is_valid(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidObjectId(raw.to_string()))
        }
    }

    #[must_use]
    pub fn is_valid(raw: &str) -> bool {
        raw.len() == OBJECT_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = InvalidObjectId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
            use std::fmt::Write;
            let _ = write!(acc, "{b:02x}");
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_valid_and_distinct() {
        let a = ObjectId::new();
        let b = ObjectId::new();

        assert!(ObjectId::is_valid(a.as_str()));
        assert_ne!(a, b);
        assert!(a < b, "ids from one process sort in creation order");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ObjectId::parse("123abc").is_err());
        assert!(ObjectId::parse("").is_err());
        assert!(ObjectId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        assert!(ObjectId::parse("59b086d7e14d76b80e5bb47611").is_err());
    }

    #[test]
    fn test_parse_normalizes_case() {
        let id = ObjectId::parse("59ADDA490C3399EB074F8A77").unwrap();
        assert_eq!(id.as_str(), "59adda490c3399eb074f8a77");
    }

    #[test]
    fn test_ids_sort_in_creation_order() {
        let ids: Vec<ObjectId> = (0..1000).map(|_| ObjectId::new()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_counter_seed_leaves_headroom() {
        for _ in 0..1000 {
            assert!(counter_seed() <= COUNTER_SEED_MASK);
        }
    }

    #[test]
    fn test_serde_validates() {
        let ok: Result<ObjectId, _> = serde_json::from_str("\"59adda490c3399eb074f8a77\"");
        assert!(ok.is_ok());

        let bad: Result<ObjectId, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }
}
