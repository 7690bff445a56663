//! The twelve element kinds this codec understands, and their wire type bytes.

use crate::bson::error::BsonError;

/// A BSON element kind, identified on the wire by a single type byte.
///
/// Only the kinds present in the original source are modeled; extensions such as Binary,
/// Timestamp, Symbol, DBPointer, JavaScript code, MinKey, and MaxKey are out of scope.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Kind {
    /// `0x01`, an 8-byte IEEE-754 little-endian float.
    Double,
    /// `0x02`, a length-prefixed, NUL-terminated UTF-8 string.
    Utf8,
    /// `0x03`, a complete embedded document.
    Document,
    /// `0x04`, a complete embedded document keyed by decimal indices.
    Array,
    /// `0x06`, a zero-length payload.
    Undefined,
    /// `0x07`, 12 raw bytes.
    ObjectId,
    /// `0x08`, a single `0x00`/`0x01` byte.
    Boolean,
    /// `0x09`, an 8-byte little-endian signed integer of milliseconds since the Unix epoch.
    DateTime,
    /// `0x0A`, a zero-length payload.
    Null,
    /// `0x0B`, two consecutive cstrings: pattern, then options.
    Regex,
    /// `0x10`, a 4-byte little-endian signed integer.
    Int32,
    /// `0x12`, an 8-byte little-endian signed integer.
    Int64,
}

impl Kind {
    /// The type byte this kind is encoded with on the wire.
    pub const fn code(self) -> u8 {
        match self {
            Kind::Double => 0x01,
            Kind::Utf8 => 0x02,
            Kind::Document => 0x03,
            Kind::Array => 0x04,
            Kind::Undefined => 0x06,
            Kind::ObjectId => 0x07,
            Kind::Boolean => 0x08,
            Kind::DateTime => 0x09,
            Kind::Null => 0x0A,
            Kind::Regex => 0x0B,
            Kind::Int32 => 0x10,
            Kind::Int64 => 0x12,
        }
    }

    /// Recovers a `Kind` from its on-the-wire type byte.
    ///
    /// Returns `BsonError::Malformed` for the terminator byte (`0x00`) and for any byte not
    /// among the twelve recognized kinds; clean termination and an unknown type byte are both
    /// surfaced as a parse failure to the iterator, which is indistinguishable from exhaustion
    /// at the `advance()` boundary (see the iterator's docs).
    pub fn from_code(code: u8) -> Result<Self, BsonError> {
        Ok(match code {
            0x01 => Kind::Double,
            0x02 => Kind::Utf8,
            0x03 => Kind::Document,
            0x04 => Kind::Array,
            0x06 => Kind::Undefined,
            0x07 => Kind::ObjectId,
            0x08 => Kind::Boolean,
            0x09 => Kind::DateTime,
            0x0A => Kind::Null,
            0x0B => Kind::Regex,
            0x10 => Kind::Int32,
            0x12 => Kind::Int64,
            other => {
                return Err(BsonError::Malformed {
                    message: format!("unrecognized BSON type byte 0x{other:02x}"),
                })
            }
        })
    }
}
