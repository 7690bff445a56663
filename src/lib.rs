//! A BSON codec and a minimal MongoDB classic wire protocol client.
//!
//! [`bson`] provides an append-only [`bson::Builder`], a zero-copy [`bson::Iter`], and the
//! reference-counted [`bson::Document`] buffer they operate over. [`wire`] frames that codec's
//! documents onto the classic `OP_QUERY`/`OP_INSERT`/`OP_UPDATE`/`OP_DELETE`/`OP_GET_MORE`/
//! `OP_KILL_CURSORS`/`OP_REPLY` wire protocol. Connection establishment, authentication, server
//! discovery, and pooling are out of scope: [`wire`] exposes only framing over an already-open
//! `AsyncRead`/`AsyncWrite` transport.
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_possible_wrap)]

pub mod bson;
pub mod error;
pub mod wire;

pub use crate::{
    bson::{ArrayBuilder, Builder, BsonError, Document, Element, Iter, Kind, ObjectId},
    error::{Error, ErrorKind, Result},
};
