/// Errors that can occur while resolving or opening a connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the specified endpoint.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// The connect attempt did not finish within the configured timeout.
    #[error("connect to {addr} timed out after {timeout:?}")]
    ConnectTimeout {
        addr: String,
        timeout: std::time::Duration,
    },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint string could not be parsed as `host:port`.
    #[error("invalid endpoint address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },
}

impl TransportError {
    /// The underlying I/O error kind, if this error carries one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            TransportError::Connect { source, .. } | TransportError::Io(source) => {
                Some(source.kind())
            }
            TransportError::ConnectTimeout { .. } => Some(std::io::ErrorKind::TimedOut),
            TransportError::InvalidAddress { .. } => None,
        }
    }

    /// True when the remote actively refused the connection.
    pub fn is_connection_refused(&self) -> bool {
        self.io_kind() == Some(std::io::ErrorKind::ConnectionRefused)
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
