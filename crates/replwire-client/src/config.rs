use std::time::Duration;

use replwire_codec::DecodeConfig;

/// Configuration for a [`Correlator`](crate::Correlator).
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Limits for decoding responses.
    pub decode: DecodeConfig,
    /// Limit for establishing each request's socket. Default: none.
    pub connect_timeout: Option<Duration>,
    /// Limit for a whole request, connect to completion marker. Default: none,
    /// so a remote that never sends `done` keeps the request pending until the
    /// caller drops it.
    pub request_timeout: Option<Duration>,
    /// Add a generated `id` to requests that do not carry one.
    pub tag_requests: bool,
}
