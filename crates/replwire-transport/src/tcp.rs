use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{Result, TransportError};

/// Host used when an endpoint is given as a bare port.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Where the remote evaluator listens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
}

impl ConnectionDescriptor {
    /// Create a descriptor for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Descriptor for a port on the loopback interface.
    pub fn localhost(port: u16) -> Self {
        Self::new(DEFAULT_HOST, port)
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ConnectionDescriptor {
    type Err = TransportError;

    /// Accepts `host:port`, `[v6]:port` or a bare `port`.
    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = |reason: &str| TransportError::InvalidAddress {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("empty address"));
        }

        let (host, port) = if let Some(rest) = trimmed.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| invalid("unterminated '[' in IPv6 host"))?;
            let port = tail
                .strip_prefix(':')
                .ok_or_else(|| invalid("missing port after IPv6 host"))?;
            (host, port)
        } else {
            match trimmed.rsplit_once(':') {
                Some((host, port)) => (host, port),
                None => (DEFAULT_HOST, trimmed),
            }
        };

        if host.is_empty() {
            return Err(invalid("empty host"));
        }
        let port: u16 = port.parse().map_err(|_| invalid("port is not a number"))?;
        if port == 0 {
            return Err(invalid("port must be non-zero"));
        }

        Ok(Self::new(host, port))
    }
}

/// Open a dedicated TCP stream to `descriptor`.
///
/// With `timeout` set, a connect that does not finish in time fails with
/// [`TransportError::ConnectTimeout`].
pub async fn connect(
    descriptor: &ConnectionDescriptor,
    timeout: Option<Duration>,
) -> Result<TcpStream> {
    let addr = descriptor.to_string();
    let attempt = TcpStream::connect((descriptor.host.as_str(), descriptor.port));

    let stream = match timeout {
        Some(limit) => tokio::time::timeout(limit, attempt)
            .await
            .map_err(|_| TransportError::ConnectTimeout {
                addr: addr.clone(),
                timeout: limit,
            })?,
        None => attempt.await,
    }
    .map_err(|source| TransportError::Connect {
        addr: addr.clone(),
        source,
    })?;

    stream.set_nodelay(true)?;
    debug!(%addr, "connected to remote evaluator");
    Ok(stream)
}
