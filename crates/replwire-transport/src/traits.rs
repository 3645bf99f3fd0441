use std::sync::RwLock;

use tracing::{error, info};

use crate::tcp::ConnectionDescriptor;

/// Source of the "current" endpoint for requests that do not name one.
///
/// The host owns this state. The client only reads it, and invalidates it when
/// the remote refuses a connection.
pub trait ConnectionProvider: Send + Sync {
    /// The current endpoint, if one is configured.
    fn current(&self) -> Option<ConnectionDescriptor>;

    /// Invalidate the current endpoint.
    fn disconnect(&self);
}

/// Sink for unrecoverable connection errors that the host should surface.
///
/// Called at most once per failed request and never awaited.
pub trait Notifier: Send + Sync {
    fn connection_error(&self, descriptor: &ConnectionDescriptor, error: &std::io::Error);
}

/// In-memory current-connection slot.
#[derive(Debug, Default)]
pub struct SharedConnection {
    inner: RwLock<Option<ConnectionDescriptor>>,
}

impl SharedConnection {
    /// A slot with nothing connected.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot already pointing at `descriptor`.
    pub fn with_descriptor(descriptor: ConnectionDescriptor) -> Self {
        Self {
            inner: RwLock::new(Some(descriptor)),
        }
    }

    /// Point the slot at a new endpoint.
    pub fn connect(&self, descriptor: ConnectionDescriptor) {
        info!(addr = %descriptor, "current connection set");
        *self.write_slot() = Some(descriptor);
    }

    fn read_slot(&self) -> std::sync::RwLockReadGuard<'_, Option<ConnectionDescriptor>> {
        // A poisoned lock still holds a valid Option.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_slot(&self) -> std::sync::RwLockWriteGuard<'_, Option<ConnectionDescriptor>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConnectionProvider for SharedConnection {
    fn current(&self) -> Option<ConnectionDescriptor> {
        self.read_slot().clone()
    }

    fn disconnect(&self) {
        if let Some(previous) = self.write_slot().take() {
            info!(addr = %previous, "current connection cleared");
        }
    }
}

/// Notifier that reports through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn connection_error(&self, descriptor: &ConnectionDescriptor, error: &std::io::Error) {
        error!(addr = %descriptor, error = %error, "connection to remote evaluator failed");
    }
}
