use std::sync::Arc;

use replwire_codec::Request;
use replwire_transport::{ConnectionDescriptor, ConnectionProvider, SharedConnection};

use crate::config::ClientConfig;
use crate::correlator::Correlator;
use crate::error::Result;
use crate::response::Response;

/// Entry point for session and evaluation operations.
///
/// Every call opens its own socket; a `Client` holds no connection, only the
/// means to find one.
#[derive(Debug, Clone)]
pub struct Client {
    correlator: Correlator,
    endpoint: Option<ConnectionDescriptor>,
}

impl Client {
    /// Client that uses the correlator's current connection.
    pub fn new(correlator: Correlator) -> Self {
        Self {
            correlator,
            endpoint: None,
        }
    }

    /// Client whose current connection starts out as `descriptor`.
    ///
    /// A refused connection clears it, after which calls fail with
    /// [`ClientError::NoConnection`](crate::ClientError::NoConnection).
    pub fn for_endpoint(descriptor: ConnectionDescriptor) -> Self {
        Self::with_provider(Arc::new(SharedConnection::with_descriptor(descriptor)))
    }

    /// Client that reads the current connection from `provider`.
    pub fn with_provider(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self::new(Correlator::new(provider))
    }

    /// Send every request to `descriptor`, ignoring the current connection.
    pub fn with_endpoint(mut self, descriptor: ConnectionDescriptor) -> Self {
        self.endpoint = Some(descriptor);
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.correlator = self.correlator.with_config(config);
        self
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    pub fn endpoint(&self) -> Option<&ConnectionDescriptor> {
        self.endpoint.as_ref()
    }

    /// Send a raw request and collect its responses.
    pub async fn send(&self, request: Request) -> Result<Vec<Response>> {
        self.correlator.send(request, self.endpoint.as_ref()).await
    }
}
