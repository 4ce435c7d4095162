use std::{future::Future, time::Duration};

use crate::{
    apiclient::AsyncMessage,
    error::TransportError,
    lsa::{Lsa, LsaType, MalformedRecord},
    lsdb::{LsaDb, LsaIdentifier},
};

/// Anything that delivers async messages one at a time.
#[allow(async_fn_in_trait)]
pub trait NotificationSource {
    async fn next_message(&mut self) -> Result<AsyncMessage, TransportError>;
}

/// Debounced completion detector: an event source is considered finished
/// once nothing has arrived for `idle_timeout`.
#[derive(Clone, Copy, Debug)]
pub struct Quiescence {
    idle_timeout: Duration,
}

impl Quiescence {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { idle_timeout }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// `None` when the window elapsed before `event` resolved.
    pub async fn next<F: Future>(&self, event: F) -> Option<F::Output> {
        tokio::time::timeout(self.idle_timeout, event).await.ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Listening,
    Done,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub messages: usize,
    pub stored: usize,
    pub replaced: usize,
    pub malformed: usize,
    pub ignored: usize,
}

/// Stores one raw LSA, returning the record it replaced.
pub fn ingest_record(lsdb: &mut LsaDb, data: &[u8]) -> Result<Option<Lsa>, MalformedRecord> {
    let lsa = Lsa::try_from_be_bytes(data)?;
    Ok(lsdb.put(lsa))
}

pub struct IngestLoop {
    quiescence: Quiescence,
    state: State,
    stats: IngestStats,
}

impl IngestLoop {
    pub fn new(quiescence: Quiescence) -> Self {
        Self {
            quiescence,
            state: State::Listening,
            stats: IngestStats::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Malformed records are dropped here and never reach the store.
    pub fn handle_message(&mut self, lsdb: &mut LsaDb, message: AsyncMessage) {
        self.stats.messages += 1;
        let result = match message {
            AsyncMessage::LsaUpdate(notification) => ingest_record(lsdb, &notification.lsa),
            AsyncMessage::Malformed(err) => Err(err),
            AsyncMessage::Other(msg_type) => {
                crate::util::debug(&format!("ignoring async message type {}", msg_type));
                self.stats.ignored += 1;
                return;
            }
        };
        match result {
            Ok(None) => self.stats.stored += 1,
            Ok(Some(old)) => {
                crate::util::debug(&format!(
                    "replaced {}",
                    LsaIdentifier::from_header(&old.header)
                ));
                self.stats.replaced += 1;
            }
            Err(err) => {
                crate::util::debug(&format!("dropping malformed record: {}", err));
                self.stats.malformed += 1;
            }
        }
    }

    /// Receives until the source stays quiet for the idle window. A
    /// transport failure aborts without reaching `Done`. Once `Done`, the
    /// source is not read again.
    pub async fn run<S>(
        &mut self,
        source: &mut S,
        lsdb: &mut LsaDb,
    ) -> Result<IngestStats, TransportError>
    where
        S: NotificationSource,
    {
        let quiescence = self.quiescence;
        while self.state == State::Listening {
            match quiescence.next(source.next_message()).await {
                Some(Ok(message)) => self.handle_message(lsdb, message),
                Some(Err(err)) => return Err(err),
                None => self.state = State::Done,
            }
        }
        crate::util::log(&format!(
            "no update for {:?}, {} LSAs received ({} router, {} network)",
            quiescence.idle_timeout(),
            lsdb.len(),
            lsdb.count(LsaType::Router),
            lsdb.count(LsaType::Network),
        ));
        Ok(self.stats)
    }
}
