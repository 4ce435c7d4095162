use std::{
    collections::{BTreeMap, BTreeSet},
    net,
};

use serde::Serialize;

use crate::{
    lsa::{router::LINK_VIRTUAL, LsaBody, LsaType},
    lsdb::LsaDb,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborType {
    P2p,
    Vlink,
    Network,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub router_id: net::Ipv4Addr,
    #[serde(rename = "type")]
    pub neighbor_type: NeighborType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouterNeighbors {
    pub router_id: net::Ipv4Addr,
    pub neighbors: Vec<Neighbor>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Router,
    Network,
}

/// A router or a transit network. Routers are named by router ID, networks
/// by the link state ID of their Network-LSA; `id` is the node's position
/// in `nodes`, so both kinds can share an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: usize,
    pub name: net::Ipv4Addr,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

/// Edge between two node ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphInfo {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphInfo {
    /// Id of the node, adding it when not yet present.
    fn node(&mut self, node_type: NodeType, name: net::Ipv4Addr) -> usize {
        if let Some(node) = self
            .nodes
            .iter()
            .find(|node| node.node_type == node_type && node.name == name)
        {
            return node.id;
        }
        let id = self.nodes.len();
        self.nodes.push(GraphNode {
            id,
            name,
            node_type,
        });
        id
    }

    fn link(&mut self, source: usize, target: usize) {
        self.links.push(GraphLink { source, target });
    }
}

/// Adjacency matrix and drawing graph of the whole database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub timestamp: String,
    pub neighbor_info: Vec<RouterNeighbors>,
    pub graph_info: GraphInfo,
}

impl Topology {
    pub fn now(lsdb: &LsaDb) -> Self {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self::build(lsdb, timestamp)
    }

    pub fn build(lsdb: &LsaDb, timestamp: String) -> Self {
        let mut neighbors: BTreeMap<net::Ipv4Addr, BTreeSet<(net::Ipv4Addr, NeighborType)>> =
            BTreeMap::new();
        let mut graph = GraphInfo::default();

        // advertised routers and networks first, routers only seen as a
        // neighbor are appended as they show up
        for lsa in lsdb.iter(LsaType::Router) {
            graph.node(NodeType::Router, lsa.header.link_state_id);
        }
        for lsa in lsdb.iter(LsaType::Network) {
            graph.node(NodeType::Network, lsa.header.link_state_id);
        }

        // router lsa: only point-to-point and virtual links name a router
        for lsa in lsdb.iter(LsaType::Router) {
            let LsaBody::Router(rlsa) = lsa.decode_body() else {
                continue;
            };
            let adv_router = lsa.header.advertising_router;
            let entry = neighbors.entry(adv_router).or_default();
            let source = graph.node(NodeType::Router, lsa.header.link_state_id);
            for link in rlsa.links.iter().filter(|link| link.is_router_adjacency()) {
                let neighbor_type = if link.link_type == LINK_VIRTUAL {
                    NeighborType::Vlink
                } else {
                    NeighborType::P2p
                };
                entry.insert((link.link_id, neighbor_type));
                let target = graph.node(NodeType::Router, link.link_id);
                graph.link(source, target);
            }
        }

        // network lsa: the attached routers are a full mesh
        for lsa in lsdb.iter(LsaType::Network) {
            let LsaBody::Network(nlsa) = lsa.decode_body() else {
                continue;
            };
            let source = graph.node(NodeType::Network, lsa.header.link_state_id);
            for src in &nlsa.attached_routers {
                for dst in nlsa.attached_routers.iter().filter(|dst| *dst != src) {
                    neighbors
                        .entry(*src)
                        .or_default()
                        .insert((*dst, NeighborType::Network));
                }
                let target = graph.node(NodeType::Router, *src);
                graph.link(source, target);
            }
        }

        let neighbor_info = neighbors
            .into_iter()
            .map(|(router_id, neighbors)| RouterNeighbors {
                router_id,
                neighbors: neighbors
                    .into_iter()
                    .map(|(router_id, neighbor_type)| Neighbor {
                        router_id,
                        neighbor_type,
                    })
                    .collect(),
            })
            .collect();

        Self {
            timestamp,
            neighbor_info,
            graph_info: graph,
        }
    }
}
