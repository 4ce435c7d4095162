use std::net;

use super::{BodyDecoder, LsaType};

pub const LINK_POINT_TO_POINT: u8 = 1;
pub const LINK_TRANSIT: u8 = 2;
pub const LINK_STUB: u8 = 3;
pub const LINK_VIRTUAL: u8 = 4;

// flags(1) + reserved(1) + link count(2)
pub const BASE_LENGTH: usize = 4;
// link id(4) + link data(4) + type(1) + tos count(1) + metric(2)
pub const LINK_LENGTH: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterLsa {
    pub flags: u8,
    pub link_count: u16,
    pub links: Vec<Link>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub link_id: net::Ipv4Addr,
    pub link_data: net::Ipv4Addr,
    pub link_type: u8,
    pub tos_count: u8,
    pub metric: u16,
}

impl Link {
    // the caller hands in exactly LINK_LENGTH bytes
    fn from_be_bytes(entry: &[u8]) -> Self {
        Self {
            link_id: net::Ipv4Addr::new(entry[0], entry[1], entry[2], entry[3]),
            link_data: net::Ipv4Addr::new(entry[4], entry[5], entry[6], entry[7]),
            link_type: entry[8],
            tos_count: entry[9],
            metric: u16::from_be_bytes([entry[10], entry[11]]),
        }
    }

    pub fn to_be_bytes(&self) -> [u8; LINK_LENGTH] {
        let mut bytes = [0; LINK_LENGTH];
        bytes[0..4].copy_from_slice(&self.link_id.octets());
        bytes[4..8].copy_from_slice(&self.link_data.octets());
        bytes[8] = self.link_type;
        bytes[9] = self.tos_count;
        bytes[10..12].copy_from_slice(&self.metric.to_be_bytes());
        bytes
    }

    /// Point-to-point and virtual links name a neighboring router.
    pub fn is_router_adjacency(&self) -> bool {
        self.link_type == LINK_POINT_TO_POINT || self.link_type == LINK_VIRTUAL
    }
}

impl RouterLsa {
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(BASE_LENGTH + self.links.len() * LINK_LENGTH);
        bytes.push(self.flags);
        bytes.push(0);
        bytes.extend_from_slice(&self.link_count.to_be_bytes());
        for link in &self.links {
            bytes.extend_from_slice(&link.to_be_bytes());
        }
        bytes
    }

    /// True when the body held fewer complete links than it announced.
    pub fn is_truncated(&self) -> bool {
        self.links.len() < self.link_count as usize
    }
}

impl BodyDecoder for RouterLsa {
    const LSA_TYPE: LsaType = LsaType::Router;

    /// Walks fixed 12-byte link entries. Stops after `link_count` entries or
    /// at the first incomplete entry, whichever comes first; a count that
    /// overstates the body is not an error.
    fn decode(body: &[u8]) -> Self {
        if body.len() < BASE_LENGTH {
            return Self {
                flags: 0,
                link_count: 0,
                links: Vec::new(),
            };
        }
        let flags = body[0];
        let link_count = u16::from_be_bytes([body[2], body[3]]);
        let links = body[BASE_LENGTH..]
            .chunks_exact(LINK_LENGTH)
            .take(link_count as usize)
            .map(Link::from_be_bytes)
            .collect();
        Self {
            flags,
            link_count,
            links,
        }
    }
}
