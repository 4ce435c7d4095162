use std::{io, net};

use crate::{
    error::{Error, Result},
    lsa::{Lsa, LsaBody, LsaType},
    lsdb::LsaDb,
};

pub mod topology;

/// Types reported, in output order.
pub const REPORT_ORDER: [LsaType; 2] = [LsaType::Router, LsaType::Network];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// One line of the text report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjacency {
    RouterLink {
        advertising_router: net::Ipv4Addr,
        link_state_id: net::Ipv4Addr,
        link_type: u8,
        link_id: net::Ipv4Addr,
        link_data: net::Ipv4Addr,
    },
    NetworkAttachment {
        advertising_router: net::Ipv4Addr,
        link_state_id: net::Ipv4Addr,
        attached_router: net::Ipv4Addr,
    },
}

impl std::fmt::Display for Adjacency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Adjacency::RouterLink {
                advertising_router,
                link_state_id,
                link_type,
                link_id,
                link_data,
            } => write!(
                f,
                "LSATYPE={} ADVROUTER={} LSAID={} LINKTYPE={} LINKID={} DATA={}",
                LsaType::Router.code(),
                advertising_router,
                link_state_id,
                link_type,
                link_id,
                link_data
            ),
            Adjacency::NetworkAttachment {
                advertising_router,
                link_state_id,
                attached_router,
            } => write!(
                f,
                "LSATYPE={} ADVROUTER={} LSAID={} ATTACHED={}",
                LsaType::Network.code(),
                advertising_router,
                link_state_id,
                attached_router
            ),
        }
    }
}

/// Adjacencies described by a single LSA.
pub fn lsa_adjacencies(lsa: &Lsa) -> Vec<Adjacency> {
    let advertising_router = lsa.header.advertising_router;
    let link_state_id = lsa.header.link_state_id;
    match lsa.decode_body() {
        LsaBody::Router(rlsa) => {
            if rlsa.is_truncated() {
                crate::util::debug(&format!(
                    "router lsa {} announces {} links, {} present",
                    link_state_id,
                    rlsa.link_count,
                    rlsa.links.len()
                ));
            }
            rlsa.links
                .iter()
                .map(|link| Adjacency::RouterLink {
                    advertising_router,
                    link_state_id,
                    link_type: link.link_type,
                    link_id: link.link_id,
                    link_data: link.link_data,
                })
                .collect()
        }
        LsaBody::Network(nlsa) => nlsa
            .attached_routers
            .iter()
            .map(|attached_router| Adjacency::NetworkAttachment {
                advertising_router,
                link_state_id,
                attached_router: *attached_router,
            })
            .collect(),
        LsaBody::Unsupported(_) => Vec::new(),
    }
}

/// Walks the database in `REPORT_ORDER`. Read-only, so it can be run any
/// number of times.
pub fn adjacencies(lsdb: &LsaDb) -> impl Iterator<Item = Adjacency> + '_ {
    REPORT_ORDER
        .into_iter()
        .flat_map(move |lsa_type| lsdb.iter(lsa_type))
        .flat_map(lsa_adjacencies)
}

pub fn write_text<W: io::Write>(lsdb: &LsaDb, out: &mut W) -> io::Result<()> {
    for adjacency in adjacencies(lsdb) {
        writeln!(out, "{}", adjacency)?;
    }
    Ok(())
}

pub fn emit<W: io::Write>(lsdb: &LsaDb, format: Format, out: &mut W) -> Result<()> {
    match format {
        Format::Text => write_text(lsdb, out).map_err(Error::Output)?,
        Format::Json => {
            let topology = topology::Topology::now(lsdb);
            serde_json::to_writer_pretty(&mut *out, &topology)?;
            writeln!(out).map_err(Error::Output)?;
        }
    }
    out.flush().map_err(Error::Output)
}
