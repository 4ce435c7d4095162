use std::{collections::BTreeMap, net};

use crate::lsa::{Header, Lsa, LsaType};

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct LsaIdentifier {
    pub lsa_type: LsaType,
    pub link_state_id: net::Ipv4Addr,
    pub advertising_router: net::Ipv4Addr,
}

impl LsaIdentifier {
    pub fn from_header(lsa_header: &Header) -> Self {
        Self {
            lsa_type: lsa_header.lsa_type,
            link_state_id: lsa_header.link_state_id,
            advertising_router: lsa_header.advertising_router,
        }
    }
}

impl std::fmt::Display for LsaIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lsa id {} adv router {}",
            self.lsa_type, self.link_state_id, self.advertising_router
        )
    }
}

/// In-memory link state database.
///
/// Keyed by (type, link state id, advertising router); a later record for
/// the same key replaces the stored one without any sequence number check.
/// Traversal within a type is ordered by (link state id, advertising
/// router), so identical input sets always produce identical reports.
#[derive(Default)]
pub struct LsaDb {
    lsas: BTreeMap<LsaIdentifier, Lsa>,
}

impl LsaDb {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Inserts or replaces, returning the record that was replaced.
    pub fn put(&mut self, lsa: Lsa) -> Option<Lsa> {
        let lsa_id = LsaIdentifier::from_header(&lsa.header);
        self.lsas.insert(lsa_id, lsa)
    }

    pub fn get(&self, lsa_id: &LsaIdentifier) -> Option<&Lsa> {
        self.lsas.get(lsa_id)
    }

    /// All records of one type. Calling it again restarts the traversal.
    pub fn iter(&self, lsa_type: LsaType) -> impl Iterator<Item = &Lsa> + Clone + '_ {
        let first = LsaIdentifier {
            lsa_type,
            link_state_id: net::Ipv4Addr::UNSPECIFIED,
            advertising_router: net::Ipv4Addr::UNSPECIFIED,
        };
        let last = LsaIdentifier {
            lsa_type,
            link_state_id: net::Ipv4Addr::BROADCAST,
            advertising_router: net::Ipv4Addr::BROADCAST,
        };
        self.lsas.range(first..=last).map(|(_, lsa)| lsa)
    }

    pub fn count(&self, lsa_type: LsaType) -> usize {
        self.iter(lsa_type).count()
    }

    pub fn len(&self) -> usize {
        self.lsas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lsas.is_empty()
    }
}
