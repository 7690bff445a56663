//! Framing for the classic MongoDB wire protocol: `int32 length | int32 request_id | int32
//! response_to | int32 op_code | body`, all integers little-endian.
//!
//! This module produces and consumes the embedded [`Document`](crate::bson::Document) bytes;
//! acquiring a transport, authenticating, server discovery, and connection pooling are the
//! caller's responsibility (see the crate root docs for the line this crate draws).

mod header;
mod message;
mod reply;
mod util;

pub use header::{Header, OpCode};
pub use message::{
    DeleteFlags,
    InsertFlags,
    OpDelete,
    OpGetMore,
    OpInsert,
    OpKillCursors,
    OpQuery,
    OpUpdate,
    QueryFlags,
    UpdateFlags,
};
pub use reply::{OpReply, ResponseFlags};
pub use util::next_request_id;
