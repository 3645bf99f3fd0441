use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::error::Result;
use crate::request::Request;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes complete bencode objects to any `AsyncWrite` stream.
pub struct ObjectWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: AsyncWrite + Unpin> ObjectWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode a request and write it in full, then flush.
    pub async fn send(&mut self, request: &Request) -> Result<()> {
        self.buf.clear();
        request.encode(&mut self.buf);
        trace!(op = request.op(), size = self.buf.len(), "writing request");
        self.write_buffer().await
    }

    async fn write_buffer(&mut self) -> Result<()> {
        self.inner.write_all(&self.buf).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
