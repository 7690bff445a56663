//! Append-only construction of BSON documents.

use crate::bson::{document::Document, error::BsonError, kind::Kind};

/// The shape of an element's payload, for the one private append primitive that all
/// `append_*` methods funnel through.
///
/// The original source passed `(data1, len1, data2, len2)` raw pointer pairs to a single C
/// helper; three kinds (UTF8, REGEX, and the pass-through case used by DOCUMENT/ARRAY) need two
/// payload pieces concatenated back to back. Modeling the shape as an enum keeps that fact out of
/// every call site without resorting to raw pointers.
enum Payload<'a> {
    None,
    One(&'a [u8]),
    Two(&'a [u8], &'a [u8]),
}

/// Builds a [`Document`] by appending elements one at a time.
///
/// `Builder` owns the in-progress byte buffer exclusively; there is no way to obtain a
/// `Document` that aliases a `Builder` still in scope, which is what keeps "no iterator may
/// observe a document mid-append" a property enforced by the type system rather than by caller
/// discipline. Call [`Builder::finish`] to take ownership of the completed [`Document`].
///
/// After every `append_*` call the buffer satisfies every [`Document`] invariant: the length
/// prefix is accurate and the buffer ends in a NUL terminator. Appends may therefore be
/// interleaved with any other (non-iterating) operation.
pub struct Builder {
    buf: Vec<u8>,
}

impl Builder {
    /// Starts building a new, empty document.
    pub fn new() -> Self {
        Builder {
            buf: super::document::EMPTY_DOCUMENT.to_vec(),
        }
    }

    /// Consumes the builder, returning the completed [`Document`].
    pub fn finish(self) -> Document {
        Document::from_bytes(self.buf).expect("Builder always maintains document invariants")
    }

    fn append(&mut self, kind: Kind, key: &str, payload: Payload<'_>) -> Result<(), BsonError> {
        validate_key(key)?;

        // Drop the trailing NUL; it is replaced by the new element and re-appended at the end.
        self.buf.pop();

        self.buf.push(kind.code());
        self.buf.extend_from_slice(key.as_bytes());
        self.buf.push(0x00);

        match payload {
            Payload::None => {}
            Payload::One(a) => self.buf.extend_from_slice(a),
            Payload::Two(a, b) => {
                self.buf.extend_from_slice(a);
                self.buf.extend_from_slice(b);
            }
        }

        self.buf.push(0x00);

        let new_len = self.buf.len() as i32;
        self.buf[0..4].copy_from_slice(&new_len.to_le_bytes());

        Ok(())
    }

    /// Appends a DOUBLE element.
    pub fn append_double(&mut self, key: &str, value: f64) -> Result<&mut Self, BsonError> {
        self.append(Kind::Double, key, Payload::One(&value.to_le_bytes()))?;
        Ok(self)
    }

    /// Appends a UTF8 string element. The stored length field includes the trailing NUL.
    pub fn append_string(&mut self, key: &str, value: &str) -> Result<&mut Self, BsonError> {
        let len_with_nul = value.len() as i32 + 1;
        let len_bytes = len_with_nul.to_le_bytes();

        let mut body = Vec::with_capacity(value.len() + 1);
        body.extend_from_slice(value.as_bytes());
        body.push(0x00);

        self.append(Kind::Utf8, key, Payload::Two(&len_bytes, &body))?;
        Ok(self)
    }

    /// Appends an embedded DOCUMENT element. `value`'s bytes are copied verbatim, including its
    /// own length prefix and terminator; they are not re-length-prefixed.
    pub fn append_document(&mut self, key: &str, value: &Document) -> Result<&mut Self, BsonError> {
        self.append(Kind::Document, key, Payload::One(value.as_bytes()))?;
        Ok(self)
    }

    /// Appends an ARRAY element. `value` must have been built with decimal-string keys
    /// `"0"`, `"1"`, ... ; the codec does not enforce this, per §4.2 ("arrays have no distinct
    /// encoding").
    pub fn append_array(&mut self, key: &str, value: &Document) -> Result<&mut Self, BsonError> {
        self.append(Kind::Array, key, Payload::One(value.as_bytes()))?;
        Ok(self)
    }

    /// Appends an UNDEFINED element (empty payload).
    pub fn append_undefined(&mut self, key: &str) -> Result<&mut Self, BsonError> {
        self.append(Kind::Undefined, key, Payload::None)?;
        Ok(self)
    }

    /// Appends an OBJECT_ID element: 12 bytes copied verbatim.
    pub fn append_object_id(
        &mut self,
        key: &str,
        value: crate::bson::ObjectId,
    ) -> Result<&mut Self, BsonError> {
        self.append(Kind::ObjectId, key, Payload::One(value.bytes()))?;
        Ok(self)
    }

    /// Appends a BOOLEAN element. Any value is coerced to exactly `0x00` or `0x01`.
    pub fn append_bool(&mut self, key: &str, value: bool) -> Result<&mut Self, BsonError> {
        let byte = [value as u8];
        self.append(Kind::Boolean, key, Payload::One(&byte))?;
        Ok(self)
    }

    /// Appends a DATE_TIME element: milliseconds since the Unix epoch, stored as an `i64` LE.
    pub fn append_date_time_ms(&mut self, key: &str, ms_since_epoch: i64) -> Result<&mut Self, BsonError> {
        self.append(
            Kind::DateTime,
            key,
            Payload::One(&ms_since_epoch.to_le_bytes()),
        )?;
        Ok(self)
    }

    /// Appends a DATE_TIME element from a `(seconds, microseconds)` wall-clock pair, applying the
    /// `sec * 1000 + usec / 1000` conversion from [`crate::bson::datetime`].
    pub fn append_date_time(&mut self, key: &str, sec: i64, usec: i64) -> Result<&mut Self, BsonError> {
        let ms = crate::bson::datetime::ms_from_wall_clock(sec, usec)?;
        self.append_date_time_ms(key, ms)
    }

    /// Appends a NULL element (empty payload).
    pub fn append_null(&mut self, key: &str) -> Result<&mut Self, BsonError> {
        self.append(Kind::Null, key, Payload::None)?;
        Ok(self)
    }

    /// Appends a REGEX element: pattern and options as two consecutive cstrings. A `None` or
    /// empty `options` is encoded as an empty string, matching the original source's fallback.
    pub fn append_regex(
        &mut self,
        key: &str,
        pattern: &str,
        options: Option<&str>,
    ) -> Result<&mut Self, BsonError> {
        validate_cstr_body(pattern)?;
        let options = options.unwrap_or("");
        validate_cstr_body(options)?;

        let mut pattern_cstr = Vec::with_capacity(pattern.len() + 1);
        pattern_cstr.extend_from_slice(pattern.as_bytes());
        pattern_cstr.push(0x00);

        let mut options_cstr = Vec::with_capacity(options.len() + 1);
        options_cstr.extend_from_slice(options.as_bytes());
        options_cstr.push(0x00);

        self.append(Kind::Regex, key, Payload::Two(&pattern_cstr, &options_cstr))?;
        Ok(self)
    }

    /// Appends an INT32 element.
    pub fn append_int32(&mut self, key: &str, value: i32) -> Result<&mut Self, BsonError> {
        self.append(Kind::Int32, key, Payload::One(&value.to_le_bytes()))?;
        Ok(self)
    }

    /// Appends an INT64 element.
    pub fn append_int64(&mut self, key: &str, value: i64) -> Result<&mut Self, BsonError> {
        self.append(Kind::Int64, key, Payload::One(&value.to_le_bytes()))?;
        Ok(self)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

fn validate_key(key: &str) -> Result<(), BsonError> {
    if key.contains('\0') {
        return Err(BsonError::InvalidKey {
            message: format!("key {key:?} contains an interior NUL byte"),
        });
    }
    Ok(())
}

fn validate_cstr_body(s: &str) -> Result<(), BsonError> {
    if s.contains('\0') {
        return Err(BsonError::InvalidKey {
            message: format!("cstring body {s:?} contains an interior NUL byte"),
        });
    }
    Ok(())
}

/// Thin sugar over [`Builder`] for constructing an ARRAY's backing document: tracks the next
/// decimal-index key so callers don't hand-manage `"0"`, `"1"`, ... themselves.
///
/// Arrays have no distinct wire encoding (§4.2); this wrapper only exists to make the common case
/// convenient, and `ArrayBuilder::finish` returns the same element-bearing [`Document`] a caller
/// would get from manually appending decimally-keyed elements to a [`Builder`].
pub struct ArrayBuilder {
    builder: Builder,
    next_index: u32,
}

impl ArrayBuilder {
    /// Starts building a new, empty array body.
    pub fn new() -> Self {
        ArrayBuilder {
            builder: Builder::new(),
            next_index: 0,
        }
    }

    fn next_key(&mut self) -> String {
        let key = self.next_index.to_string();
        self.next_index += 1;
        key
    }

    /// Appends the next element by decimal index, applying `f` to the underlying [`Builder`].
    pub fn push(
        &mut self,
        f: impl FnOnce(&mut Builder, &str) -> Result<(), BsonError>,
    ) -> Result<&mut Self, BsonError> {
        let key = self.next_key();
        f(&mut self.builder, &key)?;
        Ok(self)
    }

    /// Finishes the array body as a [`Document`], to be appended under `Kind::Array` via
    /// [`Builder::append_array`].
    pub fn finish(self) -> Document {
        self.builder.finish()
    }
}

impl Default for ArrayBuilder {
    fn default() -> Self {
        ArrayBuilder::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Byte-exact fixtures mirroring the source's tests/bson/testN.bson files.

    #[test]
    fn test1_int32() {
        let mut b = Builder::new();
        b.append_int32("int", 1).unwrap();
        let doc = b.finish();
        assert_eq!(
            doc.as_bytes(),
            &[0x0E, 0x00, 0x00, 0x00, 0x10, b'i', b'n', b't', 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test2_int64() {
        let mut b = Builder::new();
        b.append_int64("int64", 1).unwrap();
        let doc = b.finish();
        assert_eq!(doc.len(), 4 + 1 + 6 + 8 + 1);
        assert_eq!(doc.as_bytes()[4], 0x12);
        assert_eq!(*doc.as_bytes().last().unwrap(), 0x00);
    }

    #[test]
    fn test5_string() {
        let mut b = Builder::new();
        b.append_string("string", "some string").unwrap();
        let doc = b.finish();
        let bytes = doc.as_bytes();
        // type, "string\0", i32 len (12), "some string\0", terminator
        assert_eq!(bytes[4], 0x02);
        let len_field = i32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        assert_eq!(len_field, 12);
        assert_eq!(&bytes[16..28], b"some string\0");
    }

    #[test]
    fn test6_array_of_int32() {
        let mut arr = ArrayBuilder::new();
        for (i, v) in [1, 2, 3, 4, 5, 6].into_iter().enumerate() {
            arr.push(move |b, key| b.append_int32(key, v).map(|_| ())).unwrap();
            let _ = i;
        }
        let arr_doc = arr.finish();

        let mut outer = Builder::new();
        outer.append_array("array[int]", &arr_doc).unwrap();
        let doc = outer.finish();

        let mut it = doc.iter();
        let elem = it.next().unwrap().unwrap();
        assert_eq!(elem.key(), "array[int]");
        assert_eq!(elem.kind(), Kind::Array);
    }

    #[test]
    fn test9_null() {
        let mut b = Builder::new();
        b.append_null("null").unwrap();
        let doc = b.finish();
        // 4-byte length + type byte + "null\0" (5 bytes) + terminator.
        assert_eq!(doc.len(), 11);
    }

    #[test]
    fn test10_regex() {
        let mut b = Builder::new();
        b.append_regex("regex", "1234", Some("i")).unwrap();
        let doc = b.finish();
        let bytes = doc.as_bytes();
        assert_eq!(bytes[4], 0x0B);
        let after_key = 4 + 1 + "regex".len() + 1;
        assert_eq!(&bytes[after_key..after_key + 5], b"1234\0");
        assert_eq!(&bytes[after_key + 5..after_key + 7], b"i\0");
    }

    #[test]
    fn append_rejects_interior_nul_key() {
        let mut b = Builder::new();
        let err = b.append_int32("bad\0key", 1).unwrap_err();
        assert!(matches!(err, BsonError::InvalidKey { .. }));
    }

    #[test]
    fn date_time_applies_seconds_times_1000_plus_usec_over_1000() {
        let mut b = Builder::new();
        b.append_date_time("utc", 1_319_285_594, 123_000).unwrap();
        let doc = b.finish();
        let mut it = doc.iter();
        let elem = it.next().unwrap().unwrap();
        assert_eq!(elem.value_date_time().unwrap(), 1_319_285_594_123);
    }

    #[test]
    fn every_append_leaves_invariants_intact() {
        let mut b = Builder::new();
        b.append_int32("a", 1).unwrap();
        b.append_bool("b", true).unwrap();
        b.append_string("c", "hi").unwrap();
        let doc = b.finish();

        let declared = i32::from_le_bytes(doc.as_bytes()[0..4].try_into().unwrap());
        assert_eq!(declared as usize, doc.len());
        assert_eq!(*doc.as_bytes().last().unwrap(), 0);
    }
}
