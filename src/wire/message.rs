use bitflags::bitflags;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{
    header::{Header, OpCode},
    util::next_request_id,
};
use crate::{bson::Document, error::Result};

bitflags! {
    /// Flag bits for an OP_QUERY request.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct QueryFlags: u32 {
        const TAILABLE_CURSOR   = 0b0000_0010;
        const SLAVE_OK          = 0b0000_0100;
        const OPLOG_REPLAY      = 0b0000_1000;
        const NO_CURSOR_TIMEOUT = 0b0001_0000;
        const AWAIT_DATA        = 0b0010_0000;
        const EXHAUST           = 0b0100_0000;
        const PARTIAL           = 0b1000_0000;
    }
}

bitflags! {
    /// Flag bits for an OP_INSERT request.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct InsertFlags: u32 {
        const CONTINUE_ON_ERROR = 0b0000_0001;
    }
}

bitflags! {
    /// Flag bits for an OP_UPDATE request.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct UpdateFlags: u32 {
        const UPSERT     = 0b0000_0001;
        const MULTI_UPDATE = 0b0000_0010;
    }
}

bitflags! {
    /// Flag bits for an OP_DELETE request.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct DeleteFlags: u32 {
        const SINGLE_REMOVE = 0b0000_0001;
    }
}

/// A classic OP_QUERY request.
#[derive(Debug, Clone)]
pub struct OpQuery {
    pub flags: QueryFlags,
    pub full_collection_name: String,
    pub number_to_skip: i32,
    pub number_to_return: i32,
    pub query: Document,
    pub return_fields_selector: Option<Document>,
}

impl OpQuery {
    /// Serializes this request and writes it to `writer`, returning the `request_id` it was
    /// assigned so the caller can match an eventual `OpReply`.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<i32> {
        let mut body = Vec::new();
        body.extend_from_slice(&self.flags.bits().to_le_bytes());
        body.extend_from_slice(self.full_collection_name.as_bytes());
        body.push(0);
        body.extend_from_slice(&self.number_to_skip.to_le_bytes());
        body.extend_from_slice(&self.number_to_return.to_le_bytes());
        body.extend_from_slice(self.query.as_bytes());
        if let Some(selector) = &self.return_fields_selector {
            body.extend_from_slice(selector.as_bytes());
        }

        let request_id = next_request_id();
        let header = Header {
            length: (Header::LENGTH + body.len()) as i32,
            request_id,
            response_to: 0,
            op_code: OpCode::Query,
        };
        header.write_to(writer).await?;
        writer.write_all(&body).await?;
        Ok(request_id)
    }
}

/// A classic OP_INSERT request.
#[derive(Debug, Clone)]
pub struct OpInsert {
    pub flags: InsertFlags,
    pub full_collection_name: String,
    pub documents: Vec<Document>,
}

impl OpInsert {
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<i32> {
        let mut body = Vec::new();
        body.extend_from_slice(&self.flags.bits().to_le_bytes());
        body.extend_from_slice(self.full_collection_name.as_bytes());
        body.push(0);
        for doc in &self.documents {
            body.extend_from_slice(doc.as_bytes());
        }

        let request_id = next_request_id();
        let header = Header {
            length: (Header::LENGTH + body.len()) as i32,
            request_id,
            response_to: 0,
            op_code: OpCode::Insert,
        };
        header.write_to(writer).await?;
        writer.write_all(&body).await?;
        Ok(request_id)
    }
}

/// A classic OP_UPDATE request.
#[derive(Debug, Clone)]
pub struct OpUpdate {
    pub full_collection_name: String,
    pub flags: UpdateFlags,
    pub selector: Document,
    pub update: Document,
}

impl OpUpdate {
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<i32> {
        let mut body = Vec::new();
        body.extend_from_slice(&0i32.to_le_bytes()); // reserved
        body.extend_from_slice(self.full_collection_name.as_bytes());
        body.push(0);
        body.extend_from_slice(&self.flags.bits().to_le_bytes());
        body.extend_from_slice(self.selector.as_bytes());
        body.extend_from_slice(self.update.as_bytes());

        let request_id = next_request_id();
        let header = Header {
            length: (Header::LENGTH + body.len()) as i32,
            request_id,
            response_to: 0,
            op_code: OpCode::Update,
        };
        header.write_to(writer).await?;
        writer.write_all(&body).await?;
        Ok(request_id)
    }
}

/// A classic OP_DELETE request.
#[derive(Debug, Clone)]
pub struct OpDelete {
    pub full_collection_name: String,
    pub flags: DeleteFlags,
    pub selector: Document,
}

impl OpDelete {
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<i32> {
        let mut body = Vec::new();
        body.extend_from_slice(&0i32.to_le_bytes()); // reserved
        body.extend_from_slice(self.full_collection_name.as_bytes());
        body.push(0);
        body.extend_from_slice(&self.flags.bits().to_le_bytes());
        body.extend_from_slice(self.selector.as_bytes());

        let request_id = next_request_id();
        let header = Header {
            length: (Header::LENGTH + body.len()) as i32,
            request_id,
            response_to: 0,
            op_code: OpCode::Delete,
        };
        header.write_to(writer).await?;
        writer.write_all(&body).await?;
        Ok(request_id)
    }
}

/// A classic OP_GET_MORE request.
#[derive(Debug, Clone)]
pub struct OpGetMore {
    pub full_collection_name: String,
    pub number_to_return: i32,
    pub cursor_id: i64,
}

impl OpGetMore {
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<i32> {
        let mut body = Vec::new();
        body.extend_from_slice(&0i32.to_le_bytes()); // reserved
        body.extend_from_slice(self.full_collection_name.as_bytes());
        body.push(0);
        body.extend_from_slice(&self.number_to_return.to_le_bytes());
        body.extend_from_slice(&self.cursor_id.to_le_bytes());

        let request_id = next_request_id();
        let header = Header {
            length: (Header::LENGTH + body.len()) as i32,
            request_id,
            response_to: 0,
            op_code: OpCode::GetMore,
        };
        header.write_to(writer).await?;
        writer.write_all(&body).await?;
        Ok(request_id)
    }
}

/// A classic OP_KILL_CURSORS request.
#[derive(Debug, Clone)]
pub struct OpKillCursors {
    pub cursor_ids: Vec<i64>,
}

impl OpKillCursors {
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<i32> {
        let mut body = Vec::new();
        body.extend_from_slice(&0i32.to_le_bytes()); // reserved
        body.extend_from_slice(&(self.cursor_ids.len() as i32).to_le_bytes());
        for id in &self.cursor_ids {
            body.extend_from_slice(&id.to_le_bytes());
        }

        let request_id = next_request_id();
        let header = Header {
            length: (Header::LENGTH + body.len()) as i32,
            request_id,
            response_to: 0,
            op_code: OpCode::KillCursors,
        };
        header.write_to(writer).await?;
        writer.write_all(&body).await?;
        Ok(request_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bson::Builder;

    fn sample_query_doc() -> Document {
        let mut b = Builder::new();
        b.append_int32("ping", 1).unwrap();
        b.finish()
    }

    #[tokio::test]
    async fn op_query_writes_header_and_body_in_order() {
        let query = OpQuery {
            flags: QueryFlags::SLAVE_OK,
            full_collection_name: "admin.$cmd".to_string(),
            number_to_skip: 0,
            number_to_return: -1,
            query: sample_query_doc(),
            return_fields_selector: None,
        };

        let mut buf = Vec::new();
        let request_id = query.write_to(&mut buf).await.unwrap();

        let declared_len = i32::from_le_bytes(buf[0..4].try_into().unwrap());
        assert_eq!(declared_len as usize, buf.len());
        let header_request_id = i32::from_le_bytes(buf[4..8].try_into().unwrap());
        assert_eq!(header_request_id, request_id);
        let op_code = i32::from_le_bytes(buf[12..16].try_into().unwrap());
        assert_eq!(op_code, OpCode::Query as i32);

        let name_start = Header::LENGTH + 4;
        assert!(buf[name_start..].starts_with(b"admin.$cmd\0"));
    }

    #[tokio::test]
    async fn op_insert_carries_every_document() {
        let insert = OpInsert {
            flags: InsertFlags::empty(),
            full_collection_name: "db.coll".to_string(),
            documents: vec![sample_query_doc(), sample_query_doc()],
        };
        let mut buf = Vec::new();
        insert.write_to(&mut buf).await.unwrap();

        let declared_len = i32::from_le_bytes(buf[0..4].try_into().unwrap());
        assert_eq!(declared_len as usize, buf.len());
    }
}
