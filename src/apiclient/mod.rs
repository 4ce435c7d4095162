use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::TransportError;

pub mod client;
pub mod notify;

pub use client::ApiClient;
pub use notify::{AsyncMessage, LsaNotification};

pub const OSPF_API_VERSION: u8 = 1;
pub const OSPF_API_MAX_MSG_SIZE: u16 = 1540;
pub const MSG_HEADER_LENGTH: usize = 8;

// requests to the daemon
pub const MSG_REGISTER_EVENT: u8 = 3;
pub const MSG_SYNC_LSDB: u8 = 4;

// messages from the daemon
pub const MSG_REPLY: u8 = 10;
pub const MSG_READY_NOTIFY: u8 = 11;
pub const MSG_LSA_UPDATE_NOTIFY: u8 = 12;
pub const MSG_LSA_DELETE_NOTIFY: u8 = 13;

pub const ANY_ORIGIN: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MsgHeader {
    pub version: u8,
    pub msg_type: u8,
    pub msg_len: u16,
    pub msg_seq: u32,
}

impl MsgHeader {
    pub fn from_be_bytes(bytes: &[u8; MSG_HEADER_LENGTH]) -> Self {
        let mut buf = &bytes[..];
        Self {
            version: buf.get_u8(),
            msg_type: buf.get_u8(),
            msg_len: buf.get_u16(),
            msg_seq: buf.get_u32(),
        }
    }

    pub fn to_be_bytes(&self) -> [u8; MSG_HEADER_LENGTH] {
        let mut bytes = [0; MSG_HEADER_LENGTH];
        bytes[0] = self.version;
        bytes[1] = self.msg_type;
        bytes[2..4].copy_from_slice(&self.msg_len.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.msg_seq.to_be_bytes());
        bytes
    }
}

/// One OSPF API message. `msg_len` counts the body only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Msg {
    pub header: MsgHeader,
    pub body: Bytes,
}

impl Msg {
    /// Fails when the body is over the daemon's message size limit.
    pub fn new(msg_type: u8, msg_seq: u32, body: Bytes) -> Result<Self, TransportError> {
        let msg_len = u16::try_from(body.len())
            .ok()
            .filter(|len| *len <= OSPF_API_MAX_MSG_SIZE)
            .ok_or(TransportError::MessageTooLarge(body.len()))?;
        Ok(Self {
            header: MsgHeader {
                version: OSPF_API_VERSION,
                msg_type,
                msg_len,
                msg_seq,
            },
            body,
        })
    }

    pub fn to_be_bytes(&self) -> Bytes {
        let mut bytes = BytesMut::with_capacity(MSG_HEADER_LENGTH + self.body.len());
        bytes.put_slice(&self.header.to_be_bytes());
        bytes.put_slice(&self.body);
        bytes.freeze()
    }
}

pub async fn read_msg<R>(reader: &mut R) -> Result<Msg, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0; MSG_HEADER_LENGTH];
    reader.read_exact(&mut header).await?;
    let header = MsgHeader::from_be_bytes(&header);
    if header.msg_len > OSPF_API_MAX_MSG_SIZE {
        return Err(TransportError::MessageTooLarge(header.msg_len as usize));
    }
    let mut body = vec![0; header.msg_len as usize];
    reader.read_exact(&mut body).await?;
    Ok(Msg {
        header,
        body: Bytes::from(body),
    })
}

pub async fn write_msg<W>(writer: &mut W, msg: &Msg) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&msg.to_be_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Selects which LSAs the daemon reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LsaFilter {
    pub typemask: u16,
    pub origin: u8,
    pub areas: Vec<std::net::Ipv4Addr>,
}

impl LsaFilter {
    /// Every LSA type, any origin, every area.
    pub fn all() -> Self {
        Self {
            typemask: 0xffff,
            origin: ANY_ORIGIN,
            areas: Vec::new(),
        }
    }

    pub fn to_be_bytes(&self) -> Result<Bytes, TransportError> {
        let num_areas = u8::try_from(self.areas.len())
            .map_err(|_| TransportError::TooManyAreas(self.areas.len()))?;
        let mut bytes = BytesMut::with_capacity(4 + self.areas.len() * 4);
        bytes.put_u16(self.typemask);
        bytes.put_u8(self.origin);
        bytes.put_u8(num_areas);
        for area in &self.areas {
            bytes.put_slice(&area.octets());
        }
        Ok(bytes.freeze())
    }
}

/// Error code carried by a MSG_REPLY.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiErrorCode(pub i8);

impl ApiErrorCode {
    pub const OK: ApiErrorCode = ApiErrorCode(0);

    pub fn from_reply(body: &[u8]) -> Option<Self> {
        body.first().map(|code| ApiErrorCode(*code as i8))
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            0 => "OK",
            -1 => "no such interface",
            -2 => "no such area",
            -3 => "no such LSA",
            -4 => "illegal LSA type",
            -5 => "opaque type in use",
            -6 => "opaque type not registered",
            -7 => "not ready",
            -8 => "no memory",
            -9 => "error",
            _ => "undefined",
        };
        write!(f, "{} ({})", name, self.0)
    }
}
