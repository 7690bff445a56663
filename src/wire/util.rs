use std::sync::atomic::{AtomicI32, Ordering};

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{
    bson::Document,
    error::{Error, Result},
};

/// Returns a new, unique request ID, matching the reference driver's request ID allocator.
pub fn next_request_id() -> i32 {
    static REQUEST_ID: AtomicI32 = AtomicI32::new(0);
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// The largest declared document length this client will allocate for, matching the classic
/// MongoDB wire protocol's 16 MiB document size ceiling. A peer declaring a larger length is
/// lying or corrupt, not describing a legitimate document.
const MAX_BSON_DOCUMENT_SIZE: i32 = 16 * 1024 * 1024;

/// Tracks how many bytes have been read through it so far, so a caller can tell when a
/// length-bounded region of a stream (e.g. an OP_REPLY body) has been fully consumed.
pub(super) struct CountReader<'a, R> {
    reader: &'a mut R,
    bytes_read: usize,
}

impl<'a, R: AsyncRead + Unpin> CountReader<'a, R> {
    pub(super) fn new(reader: &'a mut R) -> Self {
        CountReader {
            reader,
            bytes_read: 0,
        }
    }

    pub(super) fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Reads one length-prefixed document, refusing to allocate for a declared length that
    /// exceeds either the crate's document size ceiling or `max_len` (the bytes remaining in the
    /// enclosing frame, e.g. an OP_REPLY body) — a corrupt or hostile peer can otherwise force an
    /// unbounded allocation purely by writing a large length field before any bytes are
    /// validated.
    pub(super) async fn read_document(&mut self, max_len: usize) -> Result<Document> {
        let before = self.bytes_read;
        let declared_len = self.reader.read_i32_le().await?;
        if declared_len < 5 {
            return Err(Error::invalid_response(format!(
                "document declares length {declared_len} below the 5-byte minimum"
            )));
        }
        if declared_len > MAX_BSON_DOCUMENT_SIZE {
            return Err(Error::invalid_response(format!(
                "document declares length {declared_len}, which exceeds the {MAX_BSON_DOCUMENT_SIZE}-byte document size ceiling"
            )));
        }
        if declared_len as usize > max_len {
            return Err(Error::invalid_response(format!(
                "document declares length {declared_len} but only {max_len} bytes remain in the \
                 enclosing frame"
            )));
        }
        let mut buf = vec![0u8; declared_len as usize];
        buf[0..4].copy_from_slice(&declared_len.to_le_bytes());
        self.reader.read_exact(&mut buf[4..]).await?;
        self.bytes_read = before + declared_len as usize;
        Ok(Document::from_bytes(buf)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn request_ids_are_monotonic_and_unique() {
        let a = next_request_id();
        let b = next_request_id();
        assert!(b > a);
    }

    #[tokio::test]
    async fn count_reader_tracks_bytes_across_documents() {
        let mut b = crate::bson::Builder::new();
        b.append_int32("n", 1).unwrap();
        let doc = b.finish();

        let mut bytes = Vec::new();
        bytes.extend_from_slice(doc.as_bytes());
        bytes.extend_from_slice(doc.as_bytes());

        let total_len = bytes.len();
        let mut cursor = std::io::Cursor::new(bytes);
        let mut counted = CountReader::new(&mut cursor);
        let first = counted.read_document(total_len).await.unwrap();
        assert_eq!(counted.bytes_read(), doc.len());
        let remaining = total_len - counted.bytes_read();
        let second = counted.read_document(remaining).await.unwrap();
        assert_eq!(counted.bytes_read(), doc.len() * 2);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[tokio::test]
    async fn read_document_rejects_length_exceeding_the_frame_budget() {
        let mut b = crate::bson::Builder::new();
        b.append_int32("n", 1).unwrap();
        let doc = b.finish();

        let mut cursor = std::io::Cursor::new(doc.as_bytes().to_vec());
        let mut counted = CountReader::new(&mut cursor);
        let err = counted.read_document(doc.len() - 1).await.unwrap_err();
        assert!(matches!(
            *err.kind,
            crate::error::ErrorKind::InvalidResponse { .. }
        ));
    }

    #[tokio::test]
    async fn read_document_rejects_length_over_the_size_ceiling() {
        let mut bytes = (MAX_BSON_DOCUMENT_SIZE + 1).to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        let mut cursor = std::io::Cursor::new(bytes);
        let mut counted = CountReader::new(&mut cursor);
        let err = counted
            .read_document(usize::MAX)
            .await
            .unwrap_err();
        assert!(matches!(
            *err.kind,
            crate::error::ErrorKind::InvalidResponse { .. }
        ));
    }
}
