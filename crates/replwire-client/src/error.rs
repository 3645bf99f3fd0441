use std::time::Duration;

use replwire_codec::CodecError;
use replwire_transport::TransportError;

/// Errors that can occur while talking to the remote evaluator.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No endpoint was given and no current connection is set.
    #[error("no connection: pass an endpoint or set a current connection")]
    NoConnection,

    /// Transport-level error (connect, socket options).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Codec-level error (socket I/O, malformed bencode, limits).
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The remote closed the socket before sending the completion marker.
    #[error(
        "connection closed before completion ({received} responses, {pending} undecoded bytes)"
    )]
    ConnectionClosed { received: usize, pending: usize },

    /// `clone` answered without a `new-session`.
    #[error("clone returned no new-session")]
    NoSession,

    /// `ls-sessions` answered without a completed session list.
    #[error("ls-sessions returned no session list")]
    NoSessions,

    /// The request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl ClientError {
    /// The socket-level I/O error behind this failure, if any.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            ClientError::Transport(TransportError::Connect { source, .. })
            | ClientError::Transport(TransportError::Io(source))
            | ClientError::Codec(CodecError::Io(source)) => Some(source),
            _ => None,
        }
    }

    /// True when the remote refused the connection.
    pub fn is_connection_refused(&self) -> bool {
        self.io_error()
            .is_some_and(|err| err.kind() == std::io::ErrorKind::ConnectionRefused)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
