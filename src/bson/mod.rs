//! A self-contained BSON codec: an append-only [`Builder`], a zero-copy [`Iter`], a
//! reference-counted [`Document`] buffer, and the small set of value types (`ObjectId`, the
//! [`datetime`] conversions) the wire format needs.
//!
//! Every type in this module rejects malformed input with a [`BsonError`] rather than panicking
//! or reading out of bounds; see each component's docs for the specific invariants it enforces.

mod builder;
mod diagnostics;
mod document;
mod error;
mod kind;
mod object_id;

pub mod datetime;
pub mod iter;

pub use builder::{ArrayBuilder, Builder};
pub use document::Document;
pub use error::BsonError;
pub use iter::{Element, Iter};
pub use kind::Kind;
pub use object_id::ObjectId;
