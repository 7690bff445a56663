use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

/// The legacy MongoDB wire protocol op codes this client speaks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OpCode {
    Reply = 1,
    Update = 2001,
    Insert = 2002,
    Query = 2004,
    GetMore = 2005,
    Delete = 2006,
    KillCursors = 2007,
}

impl OpCode {
    /// Recovers an `OpCode` from its on-the-wire numeric value.
    pub fn from_i32(i: i32) -> Result<Self> {
        match i {
            1 => Ok(OpCode::Reply),
            2001 => Ok(OpCode::Update),
            2002 => Ok(OpCode::Insert),
            2004 => Ok(OpCode::Query),
            2005 => Ok(OpCode::GetMore),
            2006 => Ok(OpCode::Delete),
            2007 => Ok(OpCode::KillCursors),
            other => Err(Error::invalid_response(format!(
                "unrecognized wire protocol opcode: {other}"
            ))),
        }
    }
}

/// The header present on every wire protocol message, request or reply.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    /// Total message length in bytes, including this header.
    pub length: i32,
    /// A client-assigned identifier used to match a reply to its request.
    pub request_id: i32,
    /// For a reply, the `request_id` of the message being responded to; `0` for a request.
    pub response_to: i32,
    /// The op code identifying the shape of the body that follows.
    pub op_code: OpCode,
}

impl Header {
    /// The on-the-wire size of a header: four little-endian `i32` fields.
    pub const LENGTH: usize = 4 * std::mem::size_of::<i32>();

    pub(crate) async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.length.to_le_bytes()).await?;
        writer.write_all(&self.request_id.to_le_bytes()).await?;
        writer.write_all(&self.response_to.to_le_bytes()).await?;
        writer
            .write_all(&(self.op_code as i32).to_le_bytes())
            .await?;
        Ok(())
    }

    pub(crate) async fn read_from<R: AsyncRead + Unpin + Send>(reader: &mut R) -> Result<Self> {
        let length = reader.read_i32_le().await?;
        let request_id = reader.read_i32_le().await?;
        let response_to = reader.read_i32_le().await?;
        let op_code = OpCode::from_i32(reader.read_i32_le().await?)?;
        Ok(Header {
            length,
            request_id,
            response_to,
            op_code,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn header_round_trips_through_write_and_read() {
        let header = Header {
            length: 36,
            request_id: 7,
            response_to: 0,
            op_code: OpCode::Query,
        };

        let mut buf = Vec::new();
        header.write_to(&mut buf).await.unwrap();
        assert_eq!(buf.len(), Header::LENGTH);

        let mut cursor = std::io::Cursor::new(buf);
        let parsed = Header::read_from(&mut cursor).await.unwrap();
        assert_eq!(parsed.length, 36);
        assert_eq!(parsed.request_id, 7);
        assert_eq!(parsed.response_to, 0);
        assert_eq!(parsed.op_code, OpCode::Query);
    }

    #[test]
    fn unrecognized_opcode_is_rejected() {
        let err = OpCode::from_i32(9999).unwrap_err();
        assert!(matches!(*err.kind, crate::error::ErrorKind::InvalidResponse { .. }));
    }
}
