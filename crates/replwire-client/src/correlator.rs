use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use replwire_codec::{ObjectReader, ObjectWriter, Request, Value};
use replwire_transport::{ConnectionDescriptor, ConnectionProvider, LogNotifier, Notifier};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::response::Response;

/// Sends one request per socket and collects its responses up to `done`.
///
/// Cheap to clone; clones share the connection provider, the notifier and
/// the request-id counter.
#[derive(Clone)]
pub struct Correlator {
    provider: Arc<dyn ConnectionProvider>,
    notifier: Arc<dyn Notifier>,
    config: ClientConfig,
    next_id: Arc<AtomicU64>,
}

impl Correlator {
    /// Correlator that falls back to `provider` for the current connection.
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self {
            provider,
            notifier: Arc::new(LogNotifier),
            config: ClientConfig::default(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Replace the sink for connection-refused notifications.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn ConnectionProvider> {
        &self.provider
    }

    /// Pick the endpoint for a request: explicit wins, then the current one.
    pub fn resolve(&self, explicit: Option<&ConnectionDescriptor>) -> Result<ConnectionDescriptor> {
        explicit
            .cloned()
            .or_else(|| self.provider.current())
            .ok_or(ClientError::NoConnection)
    }

    /// Send `request` on a fresh socket and return every response up to and
    /// including the one carrying `done`.
    ///
    /// A refused connection also clears the provider's current connection and
    /// notifies the host once.
    pub async fn send(
        &self,
        request: Request,
        connection: Option<&ConnectionDescriptor>,
    ) -> Result<Vec<Response>> {
        let descriptor = self.resolve(connection)?;
        let request = self.tag(request);
        let op = request.op().to_string();

        let exchange = self.exchange(&descriptor, &request);
        let result = match self.config.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(result) => result,
                Err(_) => Err(ClientError::Timeout(limit)),
            },
            None => exchange.await,
        };

        match &result {
            Ok(responses) => {
                debug!(%op, addr = %descriptor, responses = responses.len(), "request complete")
            }
            Err(err) => {
                debug!(%op, addr = %descriptor, error = %err, "request failed");
                if err.is_connection_refused() {
                    self.provider.disconnect();
                    if let Some(io) = err.io_error() {
                        self.notifier.connection_error(&descriptor, io);
                    }
                }
            }
        }

        result
    }

    fn tag(&self, mut request: Request) -> Request {
        if self.config.tag_requests && !request.contains_key("id") {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            request.set("id", id.to_string());
        }
        request
    }

    // The socket halves live only in this future; returning or dropping it
    // closes the connection.
    async fn exchange(
        &self,
        descriptor: &ConnectionDescriptor,
        request: &Request,
    ) -> Result<Vec<Response>> {
        let stream = replwire_transport::connect(descriptor, self.config.connect_timeout).await?;
        let (read_half, write_half) = stream.into_split();

        let mut writer = ObjectWriter::new(write_half);
        writer.send(request).await?;

        let mut reader = ObjectReader::with_config(read_half, self.config.decode.clone());
        let mut collector = ResponseCollector::new();

        loop {
            let Some(batch) = reader.read_batch().await? else {
                return Err(ClientError::ConnectionClosed {
                    received: collector.len(),
                    pending: reader.pending(),
                });
            };

            if collector.push_batch(batch) {
                if collector.dropped() > 0 {
                    debug!(
                        dropped = collector.dropped(),
                        "discarded objects after completion marker"
                    );
                }
                return Ok(collector.into_responses());
            }
        }
    }
}

impl std::fmt::Debug for Correlator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Correlator")
            .field("current", &self.provider.current())
            .field("config", &self.config)
            .finish()
    }
}

/// Accumulates responses for one request and spots the completion marker.
///
/// Once an object carrying `done` has been taken, everything after it is
/// counted and discarded.
#[derive(Debug, Default)]
pub struct ResponseCollector {
    responses: Vec<Response>,
    complete: bool,
    dropped: usize,
}

impl ResponseCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take one decoded batch. Returns `true` once the stream is complete.
    pub fn push_batch(&mut self, batch: Vec<Value>) -> bool {
        for value in batch {
            if self.complete {
                self.dropped += 1;
                continue;
            }
            match Response::try_from(value) {
                Ok(response) => {
                    self.complete = response.is_done();
                    self.responses.push(response);
                }
                Err(other) => {
                    warn!(kind = other.kind(), "ignoring non-dict response object");
                }
            }
        }
        self.complete
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Objects discarded after completion.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_responses(self) -> Vec<Response> {
        self.responses
    }
}
