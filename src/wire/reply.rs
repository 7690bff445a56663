use bitflags::bitflags;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{
    header::{Header, OpCode},
    util::CountReader,
};
use crate::{bson::Document, error::{Error, Result}};

bitflags! {
    /// Flag bits carried in an OP_REPLY's `response_flags` field.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct ResponseFlags: u32 {
        const CURSOR_NOT_FOUND = 0b0000_0001;
        const QUERY_FAILURE    = 0b0000_0010;
        const AWAIT_CAPABLE    = 0b0000_0100;
    }
}

/// A classic OP_REPLY, as sent by the server in response to an `OpQuery` or `OpGetMore`.
#[derive(Debug, Clone)]
pub struct OpReply {
    pub header: Header,
    pub response_flags: ResponseFlags,
    pub cursor_id: i64,
    pub starting_from: i32,
    pub number_returned: i32,
    pub documents: Vec<Document>,
}

impl OpReply {
    /// Reads and validates a complete `OpReply` from `reader`.
    ///
    /// Checks the header's declared `op_code` is `REPLY`, and that the number of documents
    /// actually present matches both `number_returned` and the length the header declared; a
    /// mismatch on either is reported as [`ErrorKind::InvalidResponse`](crate::error::ErrorKind::InvalidResponse)
    /// rather than silently truncating or over-reading.
    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self> {
        let header = Header::read_from(reader).await?;
        if header.op_code != OpCode::Reply {
            return Err(Error::invalid_response(format!(
                "expected a REPLY opcode, got {:?}",
                header.op_code
            )));
        }

        let response_flags = ResponseFlags::from_bits_truncate(reader.read_u32_le().await?);
        let cursor_id = reader.read_i64_le().await?;
        let starting_from = reader.read_i32_le().await?;
        let number_returned = reader.read_i32_le().await?;

        let fixed_fields_len = std::mem::size_of::<u32>() // response_flags
            + std::mem::size_of::<i64>() // cursor_id
            + std::mem::size_of::<i32>() // starting_from
            + std::mem::size_of::<i32>(); // number_returned

        let header_len: usize = header.length.try_into().map_err(|_| {
            Error::invalid_response(format!(
                "OP_REPLY header declared a negative length {}",
                header.length
            ))
        })?;
        let body_remaining = header_len
            .checked_sub(Header::LENGTH + fixed_fields_len)
            .ok_or_else(|| {
                Error::invalid_response(format!(
                    "OP_REPLY header declared length {header_len}, too short to hold the \
                     fixed reply fields ({} bytes)",
                    Header::LENGTH + fixed_fields_len
                ))
            })?;

        let mut counted = CountReader::new(reader);
        let mut documents = Vec::new();
        while counted.bytes_read() < body_remaining {
            let remaining_budget = body_remaining - counted.bytes_read();
            documents.push(counted.read_document(remaining_budget).await?);
        }

        if counted.bytes_read() != body_remaining {
            return Err(Error::invalid_response(format!(
                "OP_REPLY declared {} body bytes but the embedded documents totaled {}",
                body_remaining,
                counted.bytes_read()
            )));
        }

        if documents.len() != number_returned as usize {
            return Err(Error::invalid_response(format!(
                "OP_REPLY declared number_returned={number_returned} but {} documents were \
                 present",
                documents.len()
            )));
        }

        Ok(OpReply {
            header,
            response_flags,
            cursor_id,
            starting_from,
            number_returned,
            documents,
        })
    }
}
