use std::net;

use bytes::{Buf, Bytes};

use super::{Msg, MSG_LSA_UPDATE_NOTIFY};
use crate::lsa::MalformedRecord;

// ifaddr(4) + area id(4) + is_self_originated(1) + pad(3)
pub const NOTIFY_FIXED_LENGTH: usize = 12;

/// LSA update pushed by the daemon on the async channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LsaNotification {
    pub ifaddr: net::Ipv4Addr,
    pub area_id: net::Ipv4Addr,
    pub self_originated: bool,
    pub lsa: Bytes,
}

impl LsaNotification {
    pub fn try_from_be_bytes(body: &Bytes) -> Result<Self, MalformedRecord> {
        if body.len() < NOTIFY_FIXED_LENGTH {
            return Err(MalformedRecord::BufferTooShort(body.len()));
        }
        let mut buf = body.clone();
        let ifaddr = net::Ipv4Addr::from(buf.get_u32());
        let area_id = net::Ipv4Addr::from(buf.get_u32());
        let self_originated = buf.get_u8() != 0;
        buf.advance(3);
        Ok(Self {
            ifaddr,
            area_id,
            self_originated,
            lsa: buf,
        })
    }

    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(NOTIFY_FIXED_LENGTH + self.lsa.len());
        bytes.extend_from_slice(&self.ifaddr.octets());
        bytes.extend_from_slice(&self.area_id.octets());
        bytes.push(self.self_originated as u8);
        bytes.extend_from_slice(&[0; 3]);
        bytes.extend_from_slice(&self.lsa);
        bytes
    }
}

/// Anything read from the async channel. Every variant counts as activity
/// for the quiescence detector; only updates are stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsyncMessage {
    LsaUpdate(LsaNotification),
    Malformed(MalformedRecord),
    Other(u8),
}

impl From<Msg> for AsyncMessage {
    fn from(msg: Msg) -> Self {
        match msg.header.msg_type {
            MSG_LSA_UPDATE_NOTIFY => match LsaNotification::try_from_be_bytes(&msg.body) {
                Ok(notification) => AsyncMessage::LsaUpdate(notification),
                Err(err) => AsyncMessage::Malformed(err),
            },
            other => AsyncMessage::Other(other),
        }
    }
}
