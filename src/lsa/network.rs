use std::net;

use super::{BodyDecoder, LsaType};

pub const NETWORK_MASK_LENGTH: usize = 4;
pub const ATTACHED_ROUTER_LENGTH: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkLsa {
    pub network_mask: net::Ipv4Addr,
    pub attached_routers: Vec<net::Ipv4Addr>,
}

/// Reads the attached router list. There is no count field, the region
/// length decides; a trailing partial address is ignored.
pub fn attached_routers(region: &[u8]) -> Vec<net::Ipv4Addr> {
    region
        .chunks_exact(ATTACHED_ROUTER_LENGTH)
        .map(|addr| net::Ipv4Addr::new(addr[0], addr[1], addr[2], addr[3]))
        .collect()
}

impl NetworkLsa {
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(
            NETWORK_MASK_LENGTH + self.attached_routers.len() * ATTACHED_ROUTER_LENGTH,
        );
        bytes.extend_from_slice(&self.network_mask.octets());
        for router in &self.attached_routers {
            bytes.extend_from_slice(&router.octets());
        }
        bytes
    }
}

impl BodyDecoder for NetworkLsa {
    const LSA_TYPE: LsaType = LsaType::Network;

    fn decode(body: &[u8]) -> Self {
        if body.len() < NETWORK_MASK_LENGTH {
            return Self {
                network_mask: net::Ipv4Addr::UNSPECIFIED,
                attached_routers: Vec::new(),
            };
        }
        Self {
            network_mask: net::Ipv4Addr::new(body[0], body[1], body[2], body[3]),
            attached_routers: attached_routers(&body[NETWORK_MASK_LENGTH..]),
        }
    }
}
