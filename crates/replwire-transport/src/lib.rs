//! TCP transport for replwire.
//!
//! This is the lowest layer of replwire. It knows where the remote evaluator
//! lives ([`ConnectionDescriptor`]), how to open a fresh socket to it
//! ([`connect`]), and how the surrounding host publishes and invalidates the
//! "current" endpoint ([`ConnectionProvider`], [`Notifier`]).
//!
//! Nothing here keeps a socket open past a single request; pooling is not a
//! concern of this crate.

pub mod error;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use tcp::{connect, ConnectionDescriptor, DEFAULT_HOST};
pub use traits::{ConnectionProvider, LogNotifier, Notifier, SharedConnection};
