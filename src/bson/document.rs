//! The owning, reference-counted byte buffer holding one encoded BSON document.

use std::sync::Arc;

use crate::bson::{error::BsonError, iter::Iter};

/// The empty document's complete encoding: a 5-byte length prefix followed by the terminator.
pub(crate) const EMPTY_DOCUMENT: [u8; 5] = [0x05, 0x00, 0x00, 0x00, 0x00];

/// An owning handle to one encoded BSON document.
///
/// `Document` is logically immutable: the only way to produce one is [`Document::new_empty`],
/// [`Document::from_bytes`], or [`crate::bson::Builder::finish`]. It is cheap to clone — cloning
/// bumps an atomic reference count rather than copying the underlying bytes — and is `Send +
/// Sync`, so the same `Document` can be read from multiple threads concurrently (see the crate's
/// concurrency notes: a `Document` must never be mutated while any iterator borrows it, but nothing
/// prevents many immutable borrows at once).
#[derive(Clone, Eq, PartialEq)]
pub struct Document {
    pub(crate) bytes: Arc<Vec<u8>>,
}

impl Document {
    /// Returns the empty document: exactly `05 00 00 00 00`.
    pub fn new_empty() -> Self {
        Document {
            bytes: Arc::new(EMPTY_DOCUMENT.to_vec()),
        }
    }

    /// Validates and takes ownership of an externally supplied byte buffer.
    ///
    /// Fails with [`BsonError::ShortBuffer`] if:
    /// - the buffer is shorter than 5 bytes,
    /// - the leading `i32` LE declared length does not equal `buffer.len()`, or
    /// - the final byte is not `0x00`.
    ///
    /// The stricter "declared length must exactly equal the supplied buffer length" check is
    /// deliberate: an earlier revision of the source accepted any `length <= max_length`, which
    /// permits an iterator to read declared-but-absent bytes out of bounds. Exact equality is
    /// mandated here.
    ///
    /// The buffer is copied into owned storage; the caller's memory is never aliased.
    pub fn from_bytes(buffer: impl Into<Vec<u8>>) -> Result<Self, BsonError> {
        let buffer = buffer.into();

        if buffer.len() < 5 {
            return Err(BsonError::ShortBuffer {
                message: format!("document must be at least 5 bytes, got {}", buffer.len()),
            });
        }

        let declared_len = i32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
        if declared_len < 5 {
            return Err(BsonError::ShortBuffer {
                message: format!("declared length {declared_len} is below the 5-byte minimum"),
            });
        }

        if declared_len as usize != buffer.len() {
            return Err(BsonError::ShortBuffer {
                message: format!(
                    "declared length {} does not match supplied buffer length {}",
                    declared_len,
                    buffer.len()
                ),
            });
        }

        if *buffer.last().unwrap() != 0x00 {
            return Err(BsonError::ShortBuffer {
                message: "document does not end in a NUL terminator".to_string(),
            });
        }

        Ok(Document {
            bytes: Arc::new(buffer),
        })
    }

    /// Borrows the complete encoded bytes of this document.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The declared length of this document, i.e. `self.as_bytes().len()`.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether this is the empty document (`05 00 00 00 00`).
    pub fn is_empty(&self) -> bool {
        self.bytes.len() == 5
    }

    /// A forward-only, zero-copy cursor over this document's elements.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.as_bytes())
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new_empty()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_document_is_five_bytes() {
        let doc = Document::new_empty();
        assert_eq!(doc.as_bytes(), &EMPTY_DOCUMENT);
        assert_eq!(doc.len(), 5);
        assert!(doc.is_empty());
    }

    #[test]
    fn from_bytes_round_trips() {
        let doc = Document::from_bytes(EMPTY_DOCUMENT.to_vec()).unwrap();
        assert_eq!(doc.as_bytes(), &EMPTY_DOCUMENT);
    }

    #[test]
    fn rejects_declared_length_below_minimum() {
        let err = Document::from_bytes(vec![0x04, 0x00, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, BsonError::ShortBuffer { .. }));
    }

    #[test]
    fn rejects_declared_length_mismatch() {
        // Declares 6 bytes but only 5 are supplied.
        let err = Document::from_bytes(vec![0x06, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, BsonError::ShortBuffer { .. }));
    }

    #[test]
    fn rejects_missing_terminator() {
        let err = Document::from_bytes(vec![0x05, 0x00, 0x00, 0x00, 0x01]).unwrap_err();
        assert!(matches!(err, BsonError::ShortBuffer { .. }));
    }

    #[test]
    fn clone_shares_storage() {
        let doc = Document::new_empty();
        let clone = doc.clone();
        assert_eq!(Arc::strong_count(&doc.bytes), 2);
        drop(clone);
        assert_eq!(Arc::strong_count(&doc.bytes), 1);
    }
}
