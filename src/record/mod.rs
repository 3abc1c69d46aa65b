//! Record Module
//!
//! Typed records and their stored encoding.
//!
//! Each record type names its bucket and encodes itself as a compact JSON
//! object whose keys are exactly the record's attribute names. Decoding
//! rejects unknown attributes so a shape change surfaces as an error instead
//! of silently dropping data.

mod developer;
mod group;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;

pub use developer::Developer;
pub use group::Group;

/// A record stored under its own id in a dedicated bucket
pub trait Record: Serialize + DeserializeOwned {
    /// Bucket holding every record of this type
    const BUCKET: &'static str;

    /// Human-readable type name used in errors
    const KIND: &'static str;

    /// Primary key
    fn id(&self) -> &str;

    /// Encode for storage
    fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a stored value
    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Generate a fresh record id: a random 128-bit UUID (v4) in hyphenated form
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
