use std::io;

use crate::apiclient::ApiErrorCode;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal failures of a dump run. Malformed records are not in here,
/// they are dropped one by one by the ingestion loop.
pub enum Error {
    Connect { server: String, source: io::Error },
    Transport(TransportError),
    Output(io::Error),
    Json(serde_json::Error),
}

/// Failures of the OSPF API channels.
pub enum TransportError {
    Io(io::Error),
    Closed,
    MessageTooLarge(usize),
    TooManyAreas(usize),
    UnexpectedMessage(u8),
    SequenceMismatch { expected: u32, received: u32 },
    InvalidReply,
    Reply(ApiErrorCode),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Connect { server, source } => {
                write!(f, "failed to connect api server {}: {}", server, source)
            }
            Error::Transport(err) => write!(f, "api transport failure: {}", err),
            Error::Output(err) => write!(f, "failed to write report: {}", err),
            Error::Json(err) => write!(f, "failed to serialize topology: {}", err),
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connect { source, .. } => Some(source),
            Error::Transport(err) => Some(err),
            Error::Output(err) => Some(err),
            Error::Json(err) => Some(err),
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Io(err) => write!(f, "i/o error: {}", err),
            TransportError::Closed => write!(f, "connection closed by peer"),
            TransportError::MessageTooLarge(len) => {
                write!(f, "message body too large: {}", len)
            }
            TransportError::TooManyAreas(count) => {
                write!(f, "too many areas in lsa filter: {}", count)
            }
            TransportError::UnexpectedMessage(msg_type) => {
                write!(f, "unexpected message type: {}", msg_type)
            }
            TransportError::SequenceMismatch { expected, received } => write!(
                f,
                "reply sequence mismatch: expected {}, received {}",
                expected, received
            ),
            TransportError::InvalidReply => write!(f, "reply without an error code"),
            TransportError::Reply(code) => write!(f, "request rejected: {}", code),
        }
    }
}

impl std::fmt::Debug for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            TransportError::Closed
        } else {
            TransportError::Io(err)
        }
    }
}
