//! A forward-only, zero-copy cursor over a [`Document`](crate::bson::Document)'s elements.

use crate::bson::{document::Document, error::BsonError, kind::Kind};

/// The name the original source gives the terminator byte when it shows up where a type byte was
/// expected: clean end-of-document and "garbage after the declared length" look identical to the
/// parser, so both surface as `advance()` returning `false`.
const TERMINATOR: u8 = 0x00;

/// One span of a currently-parsed element's payload, recorded as byte offsets into the parent
/// buffer rather than as raw pointers (§9: "model the iterator as a plain record with named
/// fields").
#[derive(Copy, Clone, Debug)]
struct CurrentElement<'a> {
    kind: Kind,
    key: &'a str,
    /// Offset range of the raw payload bytes, excluding any length/type framing already
    /// consumed. For UTF8 and REGEX this spans the *entire* two-or-more-piece payload; accessors
    /// re-slice it as needed.
    payload: &'a [u8],
}

/// A decoded element, as produced by the [`Iterator`](std::iter::Iterator) impl on [`Iter`].
///
/// This is an owned-enough snapshot (the key and payload are still borrows of the parent
/// document) of one element, returned by the idiomatic `for element in doc.iter()` form. It is
/// pure sugar over [`Iter::advance`] plus the `value_*` accessors; nothing here changes the parse
/// algorithm.
#[derive(Copy, Clone, Debug)]
pub struct Element<'a> {
    current: CurrentElement<'a>,
}

impl<'a> Element<'a> {
    /// The element's key.
    pub fn key(&self) -> &'a str {
        self.current.key
    }

    /// The element's kind.
    pub fn kind(&self) -> Kind {
        self.current.kind
    }

    /// Decodes this element as a DOUBLE.
    pub fn value_double(&self) -> Result<f64, BsonError> {
        value_double(&self.current)
    }

    /// Decodes this element as an INT32.
    pub fn value_int32(&self) -> Result<i32, BsonError> {
        value_int32(&self.current)
    }

    /// Decodes this element as an INT64.
    pub fn value_int64(&self) -> Result<i64, BsonError> {
        value_int64(&self.current)
    }

    /// Decodes this element as a BOOLEAN.
    pub fn value_bool(&self) -> Result<bool, BsonError> {
        value_bool(&self.current)
    }

    /// Decodes this element as a UTF8 string, borrowing from the parent document.
    pub fn value_string(&self) -> Result<&'a str, BsonError> {
        value_string(&self.current)
    }

    /// Decodes this element as an OBJECT_ID.
    pub fn value_object_id(&self) -> Result<crate::bson::ObjectId, BsonError> {
        value_object_id(&self.current)
    }

    /// Decodes this element as a DATE_TIME, returning raw milliseconds since the Unix epoch.
    pub fn value_date_time(&self) -> Result<i64, BsonError> {
        value_date_time(&self.current)
    }

    /// Decodes this element as a REGEX, returning `(pattern, options)`.
    pub fn value_regex(&self) -> Result<(&'a str, &'a str), BsonError> {
        value_regex(&self.current)
    }

    /// Copies this element's embedded DOCUMENT payload into an owned [`Document`].
    pub fn value_document(&self) -> Result<Document, BsonError> {
        value_embedded(&self.current, Kind::Document)
    }

    /// Copies this element's embedded ARRAY payload into an owned [`Document`].
    pub fn value_array(&self) -> Result<Document, BsonError> {
        value_embedded(&self.current, Kind::Array)
    }

    /// Borrows this element's embedded DOCUMENT or ARRAY payload for zero-copy traversal.
    pub fn recurse(&self) -> Result<Iter<'a>, BsonError> {
        if self.current.kind != Kind::Document && self.current.kind != Kind::Array {
            kind_mismatch(self.current.key, Kind::Document, self.current.kind);
            return Err(BsonError::KindMismatch {
                expected: Kind::Document,
                found: self.current.kind,
            });
        }
        Ok(Iter::new(self.current.payload))
    }
}

/// A forward-only cursor over one [`Document`]'s bytes.
///
/// `Iter` never copies string or blob payloads: every borrowing accessor returns a slice of the
/// parent document's buffer. It validates as it goes — a malformed element invalidates the
/// cursor rather than panicking or reading out of bounds (see [`Iter::advance`]).
#[derive(Clone)]
pub struct Iter<'a> {
    doc: &'a [u8],
    offset: usize,
    current: Option<CurrentElement<'a>>,
    /// The error that caused the most recent failed `advance()`, if any. `advance()`'s `bool`
    /// return value cannot distinguish clean exhaustion from corruption; this lets a caller who
    /// cares make that distinction without changing that contract.
    last_error: Option<BsonError>,
    exhausted: bool,
}

impl<'a> Iter<'a> {
    /// Positions a cursor before the first element of `doc`.
    pub fn new(doc: &'a [u8]) -> Self {
        Iter {
            doc,
            offset: 4,
            current: None,
            last_error: None,
            exhausted: false,
        }
    }

    /// The error, if any, that caused the iterator to stop prematurely. `None` both before the
    /// first failure and after clean exhaustion.
    pub fn last_error(&self) -> Option<&BsonError> {
        self.last_error.as_ref()
    }

    fn fail(&mut self, err: BsonError) -> bool {
        self.current = None;
        self.exhausted = true;
        self.last_error = Some(err);
        false
    }

    /// Attempts to parse the next element.
    ///
    /// Returns `true` and leaves `current_key()`/`current_kind()`/`value_*` valid on success.
    /// Returns `false` on the terminator (clean end), on running out of buffer, or on any
    /// malformed element; once `false` is returned the iterator stays invalidated and every
    /// subsequent call also returns `false`.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }

        let total = self.doc.len();

        if self.offset + 1 > total {
            return self.fail(BsonError::Malformed {
                message: "cursor ran past the end of the buffer".to_string(),
            });
        }

        let type_byte = self.doc[self.offset];
        if type_byte == TERMINATOR {
            // Clean end of document: not an error, but indistinguishable from one at this
            // boundary (§4.3).
            self.current = None;
            self.exhausted = true;
            return false;
        }

        let kind = match Kind::from_code(type_byte) {
            Ok(k) => k,
            Err(e) => return self.fail(e),
        };

        let key_start = self.offset + 1;
        let key_end = match find_nul(self.doc, key_start) {
            Some(i) => i,
            None => {
                return self.fail(BsonError::Malformed {
                    message: "key is missing its NUL terminator".to_string(),
                })
            }
        };

        let key = match std::str::from_utf8(&self.doc[key_start..key_end]) {
            Ok(k) => k,
            Err(e) => {
                return self.fail(BsonError::InvalidUtf8 {
                    message: format!("key is not valid UTF-8: {e}"),
                })
            }
        };

        let payload_start = key_end + 1;
        let remaining = total.saturating_sub(payload_start);

        let (payload, next_offset) = match kind {
            Kind::Utf8 => match parse_len_prefixed_string(self.doc, payload_start, remaining) {
                Ok(v) => v,
                Err(e) => return self.fail(e),
            },
            Kind::Document | Kind::Array => {
                match parse_embedded_document(self.doc, payload_start, remaining) {
                    Ok(v) => v,
                    Err(e) => return self.fail(e),
                }
            }
            Kind::Undefined | Kind::Null => (&self.doc[payload_start..payload_start], payload_start),
            Kind::Boolean => {
                if remaining < 1 {
                    return self.fail(short_payload("BOOLEAN", 1, remaining));
                }
                (&self.doc[payload_start..payload_start + 1], payload_start + 1)
            }
            Kind::Int32 => {
                if remaining < 4 {
                    return self.fail(short_payload("INT32", 4, remaining));
                }
                (&self.doc[payload_start..payload_start + 4], payload_start + 4)
            }
            Kind::Int64 | Kind::Double | Kind::DateTime => {
                if remaining < 8 {
                    return self.fail(short_payload("INT64/DOUBLE/DATE_TIME", 8, remaining));
                }
                (&self.doc[payload_start..payload_start + 8], payload_start + 8)
            }
            Kind::ObjectId => {
                if remaining < 12 {
                    return self.fail(short_payload("OBJECT_ID", 12, remaining));
                }
                (
                    &self.doc[payload_start..payload_start + 12],
                    payload_start + 12,
                )
            }
            Kind::Regex => match parse_two_cstrings(self.doc, payload_start, remaining) {
                Ok(v) => v,
                Err(e) => return self.fail(e),
            },
        };

        self.current = Some(CurrentElement { kind, key, payload });
        self.offset = next_offset;
        true
    }

    /// Advances until an element with key `key` is found (returning `true`) or the iterator is
    /// exhausted (returning `false`). Matches in document order; the first match wins.
    pub fn find(&mut self, key: &str) -> bool {
        while self.advance() {
            if self.current_key() == Some(key) {
                return true;
            }
        }
        false
    }

    /// The key of the element currently under the cursor, if any.
    pub fn current_key(&self) -> Option<&'a str> {
        self.current.map(|c| c.key)
    }

    /// The kind of the element currently under the cursor, if any.
    pub fn current_kind(&self) -> Option<Kind> {
        self.current.map(|c| c.kind)
    }

    fn current_or_not_ready(&self) -> Result<&CurrentElement<'a>, BsonError> {
        self.current.as_ref().ok_or_else(|| BsonError::Malformed {
            message: "no element is currently under the cursor; call advance() first".to_string(),
        })
    }

    /// Decodes the current element as a DOUBLE.
    pub fn value_double(&self) -> Result<f64, BsonError> {
        value_double(self.current_or_not_ready()?)
    }

    /// Decodes the current element as an INT32.
    pub fn value_int32(&self) -> Result<i32, BsonError> {
        value_int32(self.current_or_not_ready()?)
    }

    /// Decodes the current element as an INT64.
    pub fn value_int64(&self) -> Result<i64, BsonError> {
        value_int64(self.current_or_not_ready()?)
    }

    /// Decodes the current element as a BOOLEAN.
    pub fn value_bool(&self) -> Result<bool, BsonError> {
        value_bool(self.current_or_not_ready()?)
    }

    /// Decodes the current element as a UTF8 string, borrowing from the parent document.
    pub fn value_string(&self) -> Result<&'a str, BsonError> {
        value_string(self.current_or_not_ready()?)
    }

    /// Decodes the current element as an OBJECT_ID.
    pub fn value_object_id(&self) -> Result<crate::bson::ObjectId, BsonError> {
        value_object_id(self.current_or_not_ready()?)
    }

    /// Decodes the current element as a DATE_TIME, returning raw milliseconds since the Unix
    /// epoch. Use [`crate::bson::datetime::wall_clock_from_ms`] to recover seconds/microseconds.
    pub fn value_date_time(&self) -> Result<i64, BsonError> {
        value_date_time(self.current_or_not_ready()?)
    }

    /// Decodes the current element as a REGEX, returning `(pattern, options)`.
    pub fn value_regex(&self) -> Result<(&'a str, &'a str), BsonError> {
        value_regex(self.current_or_not_ready()?)
    }

    /// Copies the current element's embedded DOCUMENT payload into an owned [`Document`].
    pub fn value_document(&self) -> Result<Document, BsonError> {
        value_embedded(self.current_or_not_ready()?, Kind::Document)
    }

    /// Copies the current element's embedded ARRAY payload into an owned [`Document`].
    pub fn value_array(&self) -> Result<Document, BsonError> {
        value_embedded(self.current_or_not_ready()?, Kind::Array)
    }

    /// Borrows the current element's embedded DOCUMENT or ARRAY payload for zero-copy traversal,
    /// without advancing `self`.
    pub fn recurse(&self) -> Result<Iter<'a>, BsonError> {
        let current = self.current_or_not_ready()?;
        if current.kind != Kind::Document && current.kind != Kind::Array {
            kind_mismatch(current.key, Kind::Document, current.kind);
            return Err(BsonError::KindMismatch {
                expected: Kind::Document,
                found: current.kind,
            });
        }
        Ok(Iter::new(current.payload))
    }
}

impl<'a> std::iter::Iterator for Iter<'a> {
    type Item = Result<Element<'a>, BsonError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.advance() {
            return self.last_error.take().map(Err);
        }
        Some(Ok(Element {
            current: self.current.expect("advance() just returned true"),
        }))
    }
}

fn kind_mismatch(key: &str, expected: Kind, found: Kind) {
    crate::bson::diagnostics::kind_mismatch_warning(key, expected, found);
}

fn value_double(current: &CurrentElement<'_>) -> Result<f64, BsonError> {
    expect_kind(current, Kind::Double)?;
    Ok(f64::from_le_bytes(current.payload.try_into().unwrap()))
}

fn value_int32(current: &CurrentElement<'_>) -> Result<i32, BsonError> {
    expect_kind(current, Kind::Int32)?;
    Ok(i32::from_le_bytes(current.payload.try_into().unwrap()))
}

fn value_int64(current: &CurrentElement<'_>) -> Result<i64, BsonError> {
    expect_kind(current, Kind::Int64)?;
    Ok(i64::from_le_bytes(current.payload.try_into().unwrap()))
}

fn value_bool(current: &CurrentElement<'_>) -> Result<bool, BsonError> {
    expect_kind(current, Kind::Boolean)?;
    Ok(current.payload[0] != 0)
}

fn value_string<'a>(current: &CurrentElement<'a>) -> Result<&'a str, BsonError> {
    expect_kind(current, Kind::Utf8)?;
    // payload is `len(4) ++ body(len bytes, NUL-terminated)`; strip the length header and the
    // trailing NUL to hand back just the string content.
    let body = &current.payload[4..];
    std::str::from_utf8(&body[..body.len() - 1]).map_err(|e| BsonError::InvalidUtf8 {
        message: format!("string value is not valid UTF-8: {e}"),
    })
}

fn value_object_id(current: &CurrentElement<'_>) -> Result<crate::bson::ObjectId, BsonError> {
    // The original source's `get_value_object_id` checked the current kind against `INT32`
    // instead of `OBJECT_ID` (§9, decision 2); this corrects that.
    expect_kind(current, Kind::ObjectId)?;
    let bytes: [u8; 12] = current.payload.try_into().unwrap();
    Ok(crate::bson::ObjectId::from_bytes(bytes))
}

fn value_date_time(current: &CurrentElement<'_>) -> Result<i64, BsonError> {
    expect_kind(current, Kind::DateTime)?;
    Ok(i64::from_le_bytes(current.payload.try_into().unwrap()))
}

fn value_regex<'a>(current: &CurrentElement<'a>) -> Result<(&'a str, &'a str), BsonError> {
    expect_kind(current, Kind::Regex)?;
    let nul = find_nul(current.payload, 0).expect("parsed regex payload has an internal NUL");
    let pattern = std::str::from_utf8(&current.payload[..nul]).map_err(|e| BsonError::InvalidUtf8 {
        message: format!("regex pattern is not valid UTF-8: {e}"),
    })?;
    let options_bytes = &current.payload[nul + 1..current.payload.len() - 1];
    let options = std::str::from_utf8(options_bytes).map_err(|e| BsonError::InvalidUtf8 {
        message: format!("regex options are not valid UTF-8: {e}"),
    })?;
    Ok((pattern, options))
}

fn value_embedded(current: &CurrentElement<'_>, expected: Kind) -> Result<Document, BsonError> {
    expect_kind(current, expected)?;
    Document::from_bytes(current.payload.to_vec())
}

fn expect_kind(current: &CurrentElement<'_>, expected: Kind) -> Result<(), BsonError> {
    if current.kind != expected {
        kind_mismatch(current.key, expected, current.kind);
        return Err(BsonError::KindMismatch {
            expected,
            found: current.kind,
        });
    }
    Ok(())
}

fn short_payload(kind_name: &str, needed: usize, remaining: usize) -> BsonError {
    BsonError::Malformed {
        message: format!(
            "{kind_name} payload needs {needed} bytes but only {remaining} remain"
        ),
    }
}

fn find_nul(buf: &[u8], from: usize) -> Option<usize> {
    buf[from..].iter().position(|&b| b == 0x00).map(|i| from + i)
}

fn parse_len_prefixed_string(
    doc: &[u8],
    start: usize,
    remaining: usize,
) -> Result<(&[u8], usize), BsonError> {
    if remaining < 5 {
        return Err(short_payload("UTF8", 5, remaining));
    }
    let declared = i32::from_le_bytes(doc[start..start + 4].try_into().unwrap());
    if declared < 1 {
        return Err(BsonError::Malformed {
            message: format!("UTF8 declared length {declared} must include the trailing NUL"),
        });
    }
    let body_len = declared as usize;
    let total_len = 4 + body_len;
    if remaining < total_len {
        return Err(BsonError::Malformed {
            message: format!(
                "UTF8 declares {body_len} body bytes but only {} remain",
                remaining - 4
            ),
        });
    }

    let body_start = start + 4;
    let body_end = body_start + body_len;
    if doc[body_end - 1] != TERMINATOR {
        return Err(BsonError::Malformed {
            message: "UTF8 body is missing its trailing NUL".to_string(),
        });
    }
    if std::str::from_utf8(&doc[body_start..body_end - 1]).is_err() {
        return Err(BsonError::InvalidUtf8 {
            message: "UTF8 value is not valid UTF-8".to_string(),
        });
    }

    Ok((&doc[start..body_end], body_end))
}

fn parse_embedded_document(
    doc: &[u8],
    start: usize,
    remaining: usize,
) -> Result<(&[u8], usize), BsonError> {
    if remaining < 5 {
        return Err(short_payload("DOCUMENT/ARRAY", 5, remaining));
    }
    let declared = i32::from_le_bytes(doc[start..start + 4].try_into().unwrap());
    if declared < 5 {
        return Err(BsonError::Malformed {
            message: format!("embedded document declares length {declared} below the 5-byte minimum"),
        });
    }
    let declared = declared as usize;
    if declared > remaining {
        return Err(BsonError::Malformed {
            message: format!(
                "embedded document declares {declared} bytes but only {remaining} remain in the \
                 parent"
            ),
        });
    }
    let end = start + declared;
    if doc[end - 1] != TERMINATOR {
        return Err(BsonError::Malformed {
            message: "embedded document is missing its trailing NUL".to_string(),
        });
    }
    Ok((&doc[start..end], end))
}

fn parse_two_cstrings(
    doc: &[u8],
    start: usize,
    remaining: usize,
) -> Result<(&[u8], usize), BsonError> {
    let first_nul = find_nul(doc, start).filter(|&i| i - start < remaining).ok_or_else(|| {
        BsonError::Malformed {
            message: "REGEX pattern is missing its NUL terminator".to_string(),
        }
    })?;
    let second_start = first_nul + 1;
    let second_remaining = remaining - (second_start - start);
    let second_nul = find_nul(doc, second_start)
        .filter(|&i| i - second_start < second_remaining)
        .ok_or_else(|| BsonError::Malformed {
            message: "REGEX options is missing its NUL terminator".to_string(),
        })?;

    if std::str::from_utf8(&doc[start..first_nul]).is_err()
        || std::str::from_utf8(&doc[second_start..second_nul]).is_err()
    {
        return Err(BsonError::InvalidUtf8 {
            message: "REGEX pattern/options is not valid UTF-8".to_string(),
        });
    }

    let end = second_nul + 1;
    Ok((&doc[start..end], end))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bson::Builder;

    #[test]
    fn empty_document_iterates_to_zero_elements() {
        let doc = Document::new_empty();
        let mut it = doc.iter();
        assert!(!it.advance());
        assert!(it.last_error().is_none());
    }

    #[test]
    fn test1_roundtrip() {
        let mut b = Builder::new();
        b.append_int32("int", 1).unwrap();
        let doc = b.finish();

        let mut it = doc.iter();
        assert!(it.advance());
        assert_eq!(it.current_key(), Some("int"));
        assert_eq!(it.current_kind(), Some(Kind::Int32));
        assert_eq!(it.value_int32().unwrap(), 1);
        assert!(!it.advance());
    }

    #[test]
    fn test6_array_recursion() {
        let mut arr = crate::bson::ArrayBuilder::new();
        for v in [1, 2, 3, 4, 5, 6] {
            arr.push(move |b, key| b.append_int32(key, v).map(|_| ())).unwrap();
        }
        let arr_doc = arr.finish();
        let mut outer = Builder::new();
        outer.append_array("array[int]", &arr_doc).unwrap();
        let doc = outer.finish();

        let mut it = doc.iter();
        assert!(it.advance());
        assert_eq!(it.current_kind(), Some(Kind::Array));
        let mut inner = it.recurse().unwrap();
        for expected in 1..=6 {
            assert!(inner.advance());
            assert_eq!(inner.current_key(), Some((expected - 1).to_string().as_str()));
            assert_eq!(inner.value_int32().unwrap(), expected);
        }
        assert!(!inner.advance());
        assert!(!it.advance());
    }

    #[test]
    fn test9_null_has_no_payload() {
        let mut b = Builder::new();
        b.append_null("null").unwrap();
        let doc = b.finish();
        let mut it = doc.iter();
        assert!(it.advance());
        assert_eq!(it.current_kind(), Some(Kind::Null));
        assert_eq!(it.current_key(), Some("null"));
        assert!(!it.advance());
    }

    #[test]
    fn test10_regex_value() {
        let mut b = Builder::new();
        b.append_regex("regex", "1234", Some("i")).unwrap();
        let doc = b.finish();
        let mut it = doc.iter();
        assert!(it.advance());
        let (pattern, options) = it.value_regex().unwrap();
        assert_eq!(pattern, "1234");
        assert_eq!(options, "i");
    }

    #[test]
    fn kind_mismatch_is_reported_not_sentinel() {
        let mut b = Builder::new();
        b.append_int32("int", 1).unwrap();
        let doc = b.finish();
        let mut it = doc.iter();
        assert!(it.advance());
        let err = it.value_string().unwrap_err();
        assert!(matches!(
            err,
            BsonError::KindMismatch {
                expected: Kind::Utf8,
                found: Kind::Int32
            }
        ));
    }

    #[test]
    fn utf8_missing_trailing_nul_is_rejected() {
        // UTF8 element with a declared length that omits the trailing NUL byte from the body.
        let mut bytes = vec![0u8; 0];
        bytes.push(0x02); // type
        bytes.extend_from_slice(b"s\0"); // key
        bytes.extend_from_slice(&2i32.to_le_bytes()); // declared len = 2
        bytes.extend_from_slice(b"hi"); // body, 2 bytes, no NUL
        let total_len = 4 + bytes.len() + 1;
        let mut doc_bytes = (total_len as i32).to_le_bytes().to_vec();
        doc_bytes.extend_from_slice(&bytes);
        doc_bytes.push(0x00);

        let doc = Document::from_bytes(doc_bytes).unwrap();
        let mut it = doc.iter();
        assert!(!it.advance());
        assert!(matches!(it.last_error(), Some(BsonError::Malformed { .. })));
    }

    #[test]
    fn nested_document_declaring_too_much_is_rejected() {
        let mut inner = Builder::new();
        inner.append_int32("x", 1).unwrap();
        let mut inner_bytes = inner.finish().as_bytes().to_vec();
        // Corrupt the inner document's declared length to claim more bytes than actually follow.
        let bumped = i32::from_le_bytes(inner_bytes[0..4].try_into().unwrap()) + 100;
        inner_bytes[0..4].copy_from_slice(&bumped.to_le_bytes());

        let mut outer = Builder::new();
        // Use append_document with an (invalid) Document built via from_bytes skipped: construct
        // the outer buffer by hand to carry the corrupted inner bytes through untouched.
        outer.append_int32("placeholder", 0).unwrap();
        let mut outer_bytes = outer.finish().as_bytes().to_vec();
        outer_bytes.pop(); // drop terminator
        outer_bytes.push(0x03); // DOCUMENT type
        outer_bytes.extend_from_slice(b"doc\0");
        outer_bytes.extend_from_slice(&inner_bytes);
        outer_bytes.push(0x00); // terminator
        let new_len = outer_bytes.len() as i32;
        outer_bytes[0..4].copy_from_slice(&new_len.to_le_bytes());

        let doc = Document::from_bytes(outer_bytes).unwrap();
        let mut it = doc.iter();
        assert!(it.advance()); // placeholder int32
        assert!(!it.advance()); // corrupted nested document
        assert!(matches!(it.last_error(), Some(BsonError::Malformed { .. })));
    }

    #[test]
    fn std_iterator_impl_yields_elements_in_order() {
        let mut b = Builder::new();
        b.append_int32("a", 1).unwrap();
        b.append_string("b", "hi").unwrap();
        let doc = b.finish();

        let collected: Vec<_> = doc.iter().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].key(), "a");
        assert_eq!(collected[1].key(), "b");
        assert_eq!(collected[1].value_string().unwrap(), "hi");
    }
}
