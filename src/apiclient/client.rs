use std::{io, net};

use bytes::Bytes;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::{lookup_host, TcpListener, TcpSocket, TcpStream},
};

use super::{
    read_msg, write_msg, ApiErrorCode, AsyncMessage, LsaFilter, Msg, MSG_REGISTER_EVENT,
    MSG_REPLY, MSG_SYNC_LSDB,
};
use crate::{
    error::{Error, TransportError},
    ingest::NotificationSource,
};

/// Client side of the OSPF API.
///
/// Requests and their replies travel on the sync channel; the daemon pushes
/// LSA notifications on the async channel, which it opens by connecting
/// back to the client.
pub struct ApiClient<S, A> {
    sync: S,
    async_channel: A,
    seq: u32,
}

impl ApiClient<TcpStream, TcpStream> {
    /// Opens the sync channel from local port `async_port` to the daemon and
    /// accepts the daemon's connect-back on `async_port + 1`.
    pub async fn connect(server: &str, server_port: u16, async_port: u16) -> Result<Self, Error> {
        let connect_error = |source: io::Error| Error::Connect {
            server: server.to_string(),
            source,
        };
        let listen_port = async_port.checked_add(1).ok_or_else(|| {
            connect_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no async port above {}", async_port),
            ))
        })?;
        let listener = TcpListener::bind((net::Ipv4Addr::UNSPECIFIED, listen_port))
            .await
            .map_err(connect_error)?;

        let server_addr = lookup_host((server, server_port))
            .await
            .map_err(connect_error)?
            .find(|addr| addr.is_ipv4())
            .ok_or_else(|| {
                connect_error(io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    "no IPv4 address",
                ))
            })?;
        let socket = TcpSocket::new_v4().map_err(connect_error)?;
        socket.set_reuseaddr(true).map_err(connect_error)?;
        socket
            .bind((net::Ipv4Addr::UNSPECIFIED, async_port).into())
            .map_err(connect_error)?;
        let sync = socket.connect(server_addr).await.map_err(connect_error)?;
        crate::util::debug(&format!("sync channel connected to {}", server_addr));

        let (async_channel, peer) = listener.accept().await.map_err(connect_error)?;
        crate::util::debug(&format!("async channel accepted from {}", peer));
        Ok(Self::new(sync, async_channel))
    }
}

impl<S, A> ApiClient<S, A>
where
    S: AsyncRead + AsyncWrite + Unpin,
    A: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(sync: S, async_channel: A) -> Self {
        Self {
            sync,
            async_channel,
            seq: 0,
        }
    }

    fn next_seq(&mut self) -> u32 {
        self.seq = self.seq.wrapping_add(1);
        self.seq
    }

    async fn send_request(&mut self, msg_type: u8, body: Bytes) -> Result<(), TransportError> {
        let seq = self.next_seq();
        write_msg(&mut self.sync, &Msg::new(msg_type, seq, body)?).await?;

        let reply = read_msg(&mut self.sync).await?;
        if reply.header.msg_type != MSG_REPLY {
            return Err(TransportError::UnexpectedMessage(reply.header.msg_type));
        }
        if reply.header.msg_seq != seq {
            return Err(TransportError::SequenceMismatch {
                expected: seq,
                received: reply.header.msg_seq,
            });
        }
        match ApiErrorCode::from_reply(&reply.body) {
            Some(ApiErrorCode::OK) => Ok(()),
            Some(code) => Err(TransportError::Reply(code)),
            None => Err(TransportError::InvalidReply),
        }
    }

    /// Subscribes to every LSA and asks the daemon to replay its database
    /// through the async channel.
    pub async fn sync_lsdb(&mut self) -> Result<(), TransportError> {
        let filter = LsaFilter::all().to_be_bytes()?;
        self.send_request(MSG_REGISTER_EVENT, filter.clone()).await?;
        self.send_request(MSG_SYNC_LSDB, filter).await
    }

    pub async fn recv_async(&mut self) -> Result<AsyncMessage, TransportError> {
        let msg = read_msg(&mut self.async_channel).await?;
        Ok(AsyncMessage::from(msg))
    }

    pub async fn close(mut self) -> Result<(), TransportError> {
        self.sync.shutdown().await?;
        self.async_channel.shutdown().await?;
        Ok(())
    }
}

impl<S, A> NotificationSource for ApiClient<S, A>
where
    S: AsyncRead + AsyncWrite + Unpin,
    A: AsyncRead + AsyncWrite + Unpin,
{
    async fn next_message(&mut self) -> Result<AsyncMessage, TransportError> {
        self.recv_async().await
    }
}
