//! Store-assigned document identifiers
//!
//! An [`ObjectId`] is 12 bytes, written as 24 hex characters:
//!
//! | bytes | content |
//! |---|---|
//! | 0..4 | seconds since the Unix epoch, big-endian |
//! | 4..9 | random value, fixed for the lifetime of the process |
//! | 9..12 | counter, big-endian, seeded randomly |
//!
//! Ids minted by one process therefore sort in creation order until the
//! 24-bit counter wraps.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);

static COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK));

/// Returned when a string is not a well-formed identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id: {0:?}")]
pub struct InvalidObjectId(pub String);

/// Opaque document identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Length of the hex form
    pub const HEX_LEN: usize = 24;

    /// Generate a fresh identifier
    pub fn new() -> Self {
        let secs = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse the 24-character hex form. Either case is accepted.
    pub fn parse(s: &str) -> Result<Self, InvalidObjectId> {
        if !Self::is_valid(s) {
            return Err(InvalidObjectId(s.to_string()));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidObjectId(s.to_string()))?;
        Ok(Self(bytes))
    }

    /// Syntactic check only; says nothing about whether a document exists
    pub fn is_valid(s: &str) -> bool {
        s.len() == Self::HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Creation time embedded in the identifier (second precision)
    pub fn timestamp(&self) -> DateTime<Utc> {
        let mut secs = [0u8; 4];
        secs.copy_from_slice(&self.0[..4]);
        DateTime::from_timestamp(i64::from(u32::from_be_bytes(secs)), 0).unwrap_or_default()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
