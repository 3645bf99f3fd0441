//! Client for nREPL-style remote evaluators.
//!
//! replwire speaks bencode over TCP: it frames requests, reassembles streamed
//! responses, correlates them up to the `done` marker, and wraps the common
//! operations (eval, load-file, completion, docs, stacktraces, tests,
//! sessions).
//!
//! # Crate Structure
//!
//! - [`transport`]: connection descriptors, TCP connect, provider/notifier seams
//! - [`codec`]: bencode values, streaming decode, async reader/writer
//! - [`client`]: request correlation, sessions and typed operations

/// Re-export transport types.
pub mod transport {
    pub use replwire_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use replwire_codec::*;
}

/// Re-export client types.
pub mod client {
    pub use replwire_client::*;
}
