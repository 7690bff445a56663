//! The typed failure surface for the BSON codec.

use thiserror::Error;

use crate::bson::kind::Kind;

/// An error produced by the BSON codec.
///
/// Every fallible codec operation returns this type instead of panicking; no input drawn from a
/// document's bytes can drive the codec into a panic, an infinite loop, or an out-of-bounds
/// read. See the module-level docs on [`crate::bson`] for the policy governing when each variant
/// is produced.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum BsonError {
    /// The declared length of an intake buffer (`Document::from_bytes`) disagreed with the
    /// supplied buffer's actual length, was below the 5-byte minimum, or the buffer did not end
    /// in a NUL terminator.
    #[error("short or malformed buffer on intake: {message}")]
    ShortBuffer {
        /// Human-readable detail.
        message: String,
    },

    /// An element could not be parsed: a length overran the remaining buffer, a terminator was
    /// missing, or the type byte was not one of the twelve recognized kinds.
    #[error("malformed BSON element: {message}")]
    Malformed {
        /// Human-readable detail.
        message: String,
    },

    /// A key, string, or regex field was not valid UTF-8.
    #[error("invalid UTF-8 in BSON field: {message}")]
    InvalidUtf8 {
        /// Human-readable detail.
        message: String,
    },

    /// An accessor was called for a kind other than the one currently under the cursor.
    #[error("BSON kind mismatch: expected {expected:?}, found {found:?}")]
    KindMismatch {
        /// The kind the accessor requires.
        expected: Kind,
        /// The kind actually under the cursor.
        found: Kind,
    },

    /// A temporal value could not be represented, e.g. overflow while computing milliseconds
    /// since the Unix epoch.
    #[error("temporal value out of range: {message}")]
    OutOfRange {
        /// Human-readable detail.
        message: String,
    },

    /// A key supplied to a builder `append_*` call was empty, contained an interior NUL byte, or
    /// was not valid UTF-8. The original source truncated such keys silently at the first NUL via
    /// `strlen`; this crate treats that as a reportable error instead of silent data loss.
    #[error("invalid BSON key: {message}")]
    InvalidKey {
        /// Human-readable detail.
        message: String,
    },
}
