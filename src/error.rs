//! Contains the `Error` and `Result` types this crate uses for everything above the BSON codec
//! itself (the codec's own failures live in [`crate::bson::BsonError`] and are wrapped here via
//! [`ErrorKind::Bson`]).

use std::fmt;

use thiserror::Error;

use crate::bson::BsonError;

/// The result type for all fallible operations in this crate above the BSON codec layer.
pub type Result<T> = std::result::Result<T, Error>;

/// An error produced by this crate.
///
/// Mirrors the `Box<ErrorKind>` pattern: the kind is boxed so that adding a large variant never
/// grows every `Result<T, Error>` in the crate, and `Error` stays cheap to move around.
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
#[non_exhaustive]
pub struct Error {
    /// The type of error that occurred.
    pub kind: Box<ErrorKind>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Error {
            kind: Box::new(kind),
        }
    }

    /// Creates an `InvalidResponse` error for a malformed or unexpected server reply.
    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidResponse {
            message: message.into(),
        })
    }
}

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        Error::new(ErrorKind::from(err))
    }
}

/// The category of error wrapped by an [`Error`].
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A BSON encode/decode failure; see [`BsonError`] for the specific cause.
    #[error("BSON error: {0}")]
    Bson(#[from] BsonError),

    /// A wire message was received but did not have the shape this client expects: a header
    /// field was inconsistent, the `response_to` did not match any outstanding request, or a
    /// reply's declared `number_returned` did not match the number of documents actually present.
    #[error("invalid server response: {message}")]
    InvalidResponse {
        /// Human-readable detail.
        message: String,
    },

    /// An I/O error occurred while reading from or writing to a connection.
    #[error("I/O error: {0}")]
    Io(#[from] IoErrorWrapper),
}

/// A cloneable wrapper around [`std::io::Error`].
///
/// `std::io::Error` is not `Clone`, but [`Error`] must be; the message and kind are preserved,
/// the original's downcastable payload is not.
#[derive(Debug)]
pub struct IoErrorWrapper(std::io::Error);

impl Clone for IoErrorWrapper {
    fn clone(&self) -> Self {
        IoErrorWrapper(std::io::Error::new(self.0.kind(), self.0.to_string()))
    }
}

impl fmt::Display for IoErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for IoErrorWrapper {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<std::io::Error> for IoErrorWrapper {
    fn from(err: std::io::Error) -> Self {
        IoErrorWrapper(err)
    }
}

impl From<std::io::Error> for ErrorKind {
    fn from(err: std::io::Error) -> Self {
        ErrorKind::Io(err.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bson_error_converts_via_from() {
        let bson_err = BsonError::Malformed {
            message: "bad".to_string(),
        };
        let err: Error = bson_err.clone().into();
        assert!(matches!(*err.kind, ErrorKind::Bson(ref e) if *e == bson_err));
    }

    #[test]
    fn io_error_is_cloneable() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: Error = io_err.into();
        let cloned = err.clone();
        assert!(matches!(*cloned.kind, ErrorKind::Io(_)));
    }
}
