//! Diagnostic logging shared by the codec's accessors.
//!
//! A kind mismatch is always reported to the caller as a [`crate::bson::BsonError`]; this module
//! additionally emits a log line so the mismatch shows up in a running process's logs even where
//! the caller only checks `.is_ok()`. Mirrors the driver's pattern of logging through `log` and,
//! behind `tracing-unstable`, also through `tracing`.

use crate::bson::kind::Kind;

pub(crate) fn kind_mismatch_warning(key: &str, expected: Kind, found: Kind) {
    log::warn!("BSON kind mismatch on key {key:?}: expected {expected:?}, found {found:?}");

    #[cfg(feature = "tracing-unstable")]
    tracing::warn!(key, ?expected, ?found, "BSON kind mismatch");
}
