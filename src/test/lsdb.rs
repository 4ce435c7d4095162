use bytes::Bytes;

use super::{addr, link, network_lsa, router_lsa};
use crate::{
    ingest::ingest_record,
    lsa::{Lsa, LsaType, MalformedRecord},
    lsdb::{LsaDb, LsaIdentifier},
};

#[test]
fn same_key_replaces_the_stored_record() {
    let mut lsdb = LsaDb::empty();
    let first = router_lsa("10.0.0.1", "10.0.0.1", vec![link(1, "10.0.0.2", "10.0.0.1")]);
    let second = router_lsa("10.0.0.1", "10.0.0.1", vec![link(3, "10.1.0.0", "255.255.0.0")]);

    assert_eq!(lsdb.put(first.clone()), None);
    assert_eq!(lsdb.put(second.clone()), Some(first));
    assert_eq!(lsdb.len(), 1);

    let lsa_id = LsaIdentifier::from_header(&second.header);
    assert_eq!(lsdb.get(&lsa_id), Some(&second));
}

#[test]
fn key_includes_type_and_advertising_router() {
    let mut lsdb = LsaDb::empty();
    lsdb.put(router_lsa("10.0.0.1", "10.0.0.1", vec![]));
    lsdb.put(router_lsa("10.0.0.1", "10.0.0.2", vec![]));
    lsdb.put(network_lsa("10.0.0.1", "10.0.0.1", &["10.0.0.1"]));
    assert_eq!(lsdb.len(), 3);
    assert_eq!(lsdb.count(LsaType::Router), 2);
    assert_eq!(lsdb.count(LsaType::Network), 1);
    assert_eq!(lsdb.count(LsaType::SummaryNetwork), 0);
}

#[test]
fn iteration_is_per_type_and_ordered() {
    let mut lsdb = LsaDb::empty();
    for id in ["10.0.0.9", "10.0.0.1", "192.168.0.1", "10.0.0.5"] {
        lsdb.put(router_lsa(id, id, vec![]));
    }
    lsdb.put(network_lsa("10.0.0.3", "10.0.0.1", &[]));
    let opaque = Lsa::new(
        LsaType::OpaqueAs,
        addr("255.255.255.255"),
        addr("255.255.255.255"),
        Bytes::new(),
    )
    .unwrap();
    lsdb.put(opaque);

    let ids: Vec<_> = lsdb
        .iter(LsaType::Router)
        .map(|lsa| lsa.header.link_state_id)
        .collect();
    assert_eq!(
        ids,
        vec![
            addr("10.0.0.1"),
            addr("10.0.0.5"),
            addr("10.0.0.9"),
            addr("192.168.0.1")
        ]
    );

    // a second traversal starts over
    let again: Vec<_> = lsdb
        .iter(LsaType::Router)
        .map(|lsa| lsa.header.link_state_id)
        .collect();
    assert_eq!(ids, again);

    let iter = lsdb.iter(LsaType::Network);
    assert_eq!(iter.clone().count(), 1);
    assert_eq!(iter.count(), 1);
    assert_eq!(lsdb.count(LsaType::OpaqueAs), 1);
}

#[test]
fn malformed_record_leaves_the_store_unchanged() {
    let mut lsdb = LsaDb::empty();
    lsdb.put(network_lsa("10.0.0.3", "10.0.0.1", &["10.0.0.1"]));

    let mut data = router_lsa("10.0.0.1", "10.0.0.1", vec![link(1, "10.0.0.2", "10.0.0.1")])
        .to_be_bytes();
    data.truncate(data.len() - 4);
    assert!(matches!(
        ingest_record(&mut lsdb, &data),
        Err(MalformedRecord::InvalidLength { .. })
    ));
    assert_eq!(lsdb.len(), 1);
    assert_eq!(lsdb.count(LsaType::Router), 0);
}

#[test]
fn well_formed_record_is_stored() {
    let mut lsdb = LsaDb::empty();
    let lsa = router_lsa("10.0.0.1", "10.0.0.1", vec![link(1, "10.0.0.2", "10.0.0.1")]);
    assert_eq!(ingest_record(&mut lsdb, &lsa.to_be_bytes()), Ok(None));
    assert_eq!(lsdb.iter(LsaType::Router).next(), Some(&lsa));
}
