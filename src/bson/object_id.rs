//! A 12-byte opaque identifier with value semantics.

use std::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use rand::RngCore;

/// An opaque 12-byte identifier.
///
/// The codec imposes no interpretation on the bytes: equality, ordering, and hashing are
/// bytewise. [`ObjectId::new`] supplies the conventional timestamp + machine + pid + counter
/// construction for callers that want fresh identifiers; the BSON wire format itself only cares
/// that the payload is exactly 12 bytes (see [`Kind::ObjectId`](crate::bson::Kind::ObjectId)).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Wraps an existing 12-byte value.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId(bytes)
    }

    /// Borrows the underlying 12 bytes.
    pub const fn bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Generates a fresh `ObjectId`: a 4-byte seconds-since-epoch timestamp, a 5-byte random
    /// "machine+pid" value generated once per process, and a 3-byte counter that increments
    /// across calls within the process.
    ///
    /// This generator is conventional but was absent from the original source; it is supplied
    /// here as ambient convenience and is never required for wire correctness (a caller can
    /// always build one from externally-supplied bytes via [`ObjectId::from_bytes`]).
    pub fn new() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(&process_unique()[..]);

        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;
        let count_bytes = count.to_be_bytes();
        bytes[9..12].copy_from_slice(&count_bytes[1..4]);

        ObjectId(bytes)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::new()
    }
}

/// A 5-byte value unique to this process, generated once and reused for every `ObjectId::new()`
/// call, mirroring the "machine identifier + process id" portion of the conventional scheme.
fn process_unique() -> [u8; 5] {
    use std::sync::OnceLock;

    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    *UNIQUE.get_or_init(|| {
        let mut buf = [0u8; 5];
        rand::rng().fill_bytes(&mut buf);
        buf
    })
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId(\"{self}\")")
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
