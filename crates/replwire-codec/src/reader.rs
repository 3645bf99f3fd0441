use std::io::ErrorKind;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::codec::{decode_objects_with_config, DecodeConfig};
use crate::error::Result;
use crate::value::Value;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads bencode objects from any `AsyncRead` stream.
///
/// Owns the remainder between reads; every call to [`read_batch`](Self::read_batch)
/// performs one read and returns whatever complete objects it produced.
pub struct ObjectReader<T> {
    inner: T,
    buf: BytesMut,
    config: DecodeConfig,
}

impl<T: AsyncRead + Unpin> ObjectReader<T> {
    /// Create a new object reader with default limits.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, DecodeConfig::default())
    }

    /// Create a new object reader with explicit limits.
    pub fn with_config(inner: T, config: DecodeConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read once and decode.
    ///
    /// Returns `Ok(None)` on EOF. `Ok(Some(vec![]))` means bytes arrived but
    /// no object is complete yet. Fails with [`CodecError::TooLarge`] once the
    /// unfinished tail grows past [`DecodeConfig::max_pending`].
    ///
    /// [`CodecError::TooLarge`]: crate::CodecError::TooLarge
    pub async fn read_batch(&mut self) -> Result<Option<Vec<Value>>> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = loop {
            match self.inner.read(&mut chunk).await {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };

        if read == 0 {
            return Ok(None);
        }

        self.buf.extend_from_slice(&chunk[..read]);
        let decoded = decode_objects_with_config(&self.buf, &self.config)?;
        let consumed = decoded.consumed(self.buf.len());
        let objects = decoded.objects;
        self.buf.advance(consumed);
        self.config.check_pending(self.buf.len())?;

        trace!(
            read,
            objects = objects.len(),
            pending = self.buf.len(),
            "decoded batch"
        );
        Ok(Some(objects))
    }

    /// Bytes received but not yet part of a complete object.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current decode limits.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }
}
