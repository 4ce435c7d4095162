use bytes::Bytes;
use tokio::io::{duplex, AsyncWriteExt, DuplexStream};

use super::{addr, router_lsa};
use crate::{
    apiclient::{
        read_msg, write_msg, ApiClient, ApiErrorCode, AsyncMessage, LsaFilter, LsaNotification,
        Msg, MsgHeader, MSG_HEADER_LENGTH, MSG_LSA_DELETE_NOTIFY, MSG_LSA_UPDATE_NOTIFY,
        MSG_REGISTER_EVENT, MSG_REPLY, MSG_SYNC_LSDB, OSPF_API_MAX_MSG_SIZE, OSPF_API_VERSION,
    },
    error::{Error, TransportError},
    lsa::MalformedRecord,
};

struct Daemon {
    sync: DuplexStream,
    async_channel: DuplexStream,
}

fn pair() -> (ApiClient<DuplexStream, DuplexStream>, Daemon) {
    let (client_sync, daemon_sync) = duplex(4096);
    let (client_async, daemon_async) = duplex(4096);
    (
        ApiClient::new(client_sync, client_async),
        Daemon {
            sync: daemon_sync,
            async_channel: daemon_async,
        },
    )
}

fn reply(seq: u32, code: i8) -> Msg {
    Msg::new(MSG_REPLY, seq, Bytes::from(vec![code as u8, 0, 0, 0])).unwrap()
}

#[test]
fn header_layout() {
    let body = Bytes::from_static(&[0xff, 0xff, 2, 0]);
    let msg = Msg::new(MSG_SYNC_LSDB, 0x01020304, body).unwrap();
    let bytes = msg.to_be_bytes();
    assert_eq!(
        bytes.as_ref(),
        &[OSPF_API_VERSION, MSG_SYNC_LSDB, 0, 4, 1, 2, 3, 4, 0xff, 0xff, 2, 0]
    );
    let mut header = [0; MSG_HEADER_LENGTH];
    header.copy_from_slice(&bytes[..MSG_HEADER_LENGTH]);
    assert_eq!(MsgHeader::from_be_bytes(&header), msg.header);
}

#[tokio::test]
async fn sync_lsdb_registers_then_syncs() {
    let (mut client, mut daemon) = pair();
    let server = tokio::spawn(async move {
        let mut requests = Vec::new();
        for _ in 0..2 {
            let request = read_msg(&mut daemon.sync).await.unwrap();
            write_msg(&mut daemon.sync, &reply(request.header.msg_seq, 0))
                .await
                .unwrap();
            requests.push(request);
        }
        requests
    });

    client.sync_lsdb().await.unwrap();
    let requests = server.await.unwrap();

    assert_eq!(requests[0].header.msg_type, MSG_REGISTER_EVENT);
    assert_eq!(requests[1].header.msg_type, MSG_SYNC_LSDB);
    assert_eq!(requests[0].header.msg_seq, 1);
    assert_eq!(requests[1].header.msg_seq, 2);
    for request in &requests {
        assert_eq!(request.header.version, OSPF_API_VERSION);
        assert_eq!(request.body.as_ref(), &[0xff, 0xff, 2, 0]);
    }
}

#[tokio::test]
async fn rejected_request_is_a_transport_failure() {
    let (mut client, mut daemon) = pair();
    tokio::spawn(async move {
        let request = read_msg(&mut daemon.sync).await.unwrap();
        write_msg(&mut daemon.sync, &reply(request.header.msg_seq, -7))
            .await
            .unwrap();
    });

    let result = client.sync_lsdb().await;
    assert!(matches!(result, Err(TransportError::Reply(ApiErrorCode(-7)))));
}

#[tokio::test]
async fn reply_must_match_the_request_sequence() {
    let (mut client, mut daemon) = pair();
    tokio::spawn(async move {
        let request = read_msg(&mut daemon.sync).await.unwrap();
        write_msg(&mut daemon.sync, &reply(request.header.msg_seq + 10, 0))
            .await
            .unwrap();
    });

    let result = client.sync_lsdb().await;
    assert!(matches!(
        result,
        Err(TransportError::SequenceMismatch {
            expected: 1,
            received: 11
        })
    ));
}

#[tokio::test]
async fn async_messages_are_classified() {
    let (mut client, mut daemon) = pair();
    let lsa = router_lsa("10.0.0.1", "10.0.0.1", vec![]);
    let notification = LsaNotification {
        ifaddr: addr("192.168.0.1"),
        area_id: addr("0.0.0.1"),
        self_originated: true,
        lsa: Bytes::from(lsa.to_be_bytes()),
    };

    let update = Msg::new(
        MSG_LSA_UPDATE_NOTIFY,
        0,
        Bytes::from(notification.to_be_bytes()),
    )
    .unwrap();
    write_msg(&mut daemon.async_channel, &update).await.unwrap();
    let delete = Msg::new(
        MSG_LSA_DELETE_NOTIFY,
        0,
        Bytes::from(notification.to_be_bytes()),
    )
    .unwrap();
    write_msg(&mut daemon.async_channel, &delete).await.unwrap();
    let short = Msg::new(MSG_LSA_UPDATE_NOTIFY, 0, Bytes::from_static(&[0; 5]))
        .unwrap();
    write_msg(&mut daemon.async_channel, &short).await.unwrap();

    assert_eq!(
        client.recv_async().await.unwrap(),
        AsyncMessage::LsaUpdate(notification)
    );
    assert_eq!(
        client.recv_async().await.unwrap(),
        AsyncMessage::Other(MSG_LSA_DELETE_NOTIFY)
    );
    assert_eq!(
        client.recv_async().await.unwrap(),
        AsyncMessage::Malformed(MalformedRecord::BufferTooShort(5))
    );
}

#[tokio::test]
async fn closed_async_channel_is_fatal() {
    let (mut client, daemon) = pair();
    drop(daemon.async_channel);
    assert!(matches!(
        client.recv_async().await,
        Err(TransportError::Closed)
    ));
}

#[tokio::test]
async fn oversized_message_is_fatal() {
    let (mut client, mut daemon) = pair();
    daemon
        .async_channel
        .write_all(&[OSPF_API_VERSION, MSG_LSA_UPDATE_NOTIFY, 0x10, 0x00, 0, 0, 0, 1])
        .await
        .unwrap();
    assert!(matches!(
        client.recv_async().await,
        Err(TransportError::MessageTooLarge(0x1000))
    ));
}

#[test]
fn error_codes_print_their_meaning() {
    assert_eq!(ApiErrorCode(-7).to_string(), "not ready (-7)");
    assert_eq!(ApiErrorCode::OK.to_string(), "OK (0)");
}

#[test]
fn outgoing_message_respects_the_size_limit() {
    let limit = OSPF_API_MAX_MSG_SIZE as usize;
    let msg = Msg::new(MSG_SYNC_LSDB, 1, Bytes::from(vec![0; limit])).unwrap();
    assert_eq!(msg.header.msg_len, OSPF_API_MAX_MSG_SIZE);

    let result = Msg::new(MSG_SYNC_LSDB, 1, Bytes::from(vec![0; limit + 1]));
    assert!(matches!(result, Err(TransportError::MessageTooLarge(len)) if len == limit + 1));
    let result = Msg::new(MSG_SYNC_LSDB, 1, Bytes::from(vec![0; 65536]));
    assert!(matches!(result, Err(TransportError::MessageTooLarge(65536))));
}

#[test]
fn filter_area_count_fits_one_byte() {
    let mut filter = LsaFilter::all();
    filter.areas = vec![std::net::Ipv4Addr::UNSPECIFIED; 255];
    assert_eq!(filter.to_be_bytes().unwrap()[3], 255);

    filter.areas.push(std::net::Ipv4Addr::UNSPECIFIED);
    assert!(matches!(
        filter.to_be_bytes(),
        Err(TransportError::TooManyAreas(256))
    ));
}

#[test]
fn rejected_sync_request_reads_as_a_transport_failure() {
    let err = Error::from(TransportError::Reply(ApiErrorCode(-7)));
    assert_eq!(
        err.to_string(),
        "api transport failure: request rejected: not ready (-7)"
    );
}
