use std::net;

use bytes::Bytes;

use crate::lsa::{
    network::NetworkLsa,
    router::{Link, RouterLsa},
    Lsa, LsaType,
};

mod apiclient;
mod lsdb;

pub fn addr(addr: &str) -> net::Ipv4Addr {
    addr.parse().unwrap()
}

pub fn link(link_type: u8, link_id: &str, link_data: &str) -> Link {
    Link {
        link_id: addr(link_id),
        link_data: addr(link_data),
        link_type,
        tos_count: 0,
        metric: 10,
    }
}

pub fn router_lsa(link_state_id: &str, adv_router: &str, links: Vec<Link>) -> Lsa {
    let body = RouterLsa {
        flags: 0,
        link_count: links.len() as u16,
        links,
    };
    Lsa::new(
        LsaType::Router,
        addr(link_state_id),
        addr(adv_router),
        Bytes::from(body.to_be_bytes()),
    )
    .unwrap()
}

pub fn network_lsa(link_state_id: &str, adv_router: &str, attached: &[&str]) -> Lsa {
    let body = NetworkLsa {
        network_mask: addr("255.255.255.0"),
        attached_routers: attached.iter().map(|router| addr(router)).collect(),
    };
    Lsa::new(
        LsaType::Network,
        addr(link_state_id),
        addr(adv_router),
        Bytes::from(body.to_be_bytes()),
    )
    .unwrap()
}
