use std::{io, time::Duration};

use tokio::io::{AsyncRead, AsyncWrite};

pub mod apiclient;
pub mod cli;
pub mod error;
pub mod ingest;
pub mod lsa;
pub mod lsdb;
pub mod report;
pub mod util;

#[cfg(test)]
mod test;

use apiclient::ApiClient;
use ingest::{IngestLoop, Quiescence};
use lsdb::LsaDb;
use report::Format;

pub const OSPF_API_SYNC_PORT: u16 = 2607;
pub const ASYNC_PORT: u16 = 40000;
/// Silence on the async channel after which the database is taken as synced.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(500);

/// Connects to the daemon and writes the report of its database to `out`.
pub async fn dump<W: io::Write>(config: &cli::Config, out: &mut W) -> error::Result<()> {
    let client =
        ApiClient::connect(&config.server, config.server_port, config.async_port).await?;
    run_session(client, config.idle_timeout, config.format, out).await
}

/// Full sync, ingest until quiet, close, then report. Nothing is written
/// when the transport fails.
pub async fn run_session<S, A, W>(
    mut client: ApiClient<S, A>,
    idle_timeout: Duration,
    format: Format,
    out: &mut W,
) -> error::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    A: AsyncRead + AsyncWrite + Unpin,
    W: io::Write,
{
    let mut lsdb = LsaDb::empty();
    client.sync_lsdb().await?;

    let mut ingest = IngestLoop::new(Quiescence::new(idle_timeout));
    let stats = ingest.run(&mut client, &mut lsdb).await?;
    util::debug(&format!("{:?}", stats));

    if let Err(err) = client.close().await {
        util::error(&format!("failed to close api client: {}", err));
    }

    report::emit(&lsdb, format, out)
}
