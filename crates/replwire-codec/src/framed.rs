//! `tokio_util::codec` adapter for framed bencode streams.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_one, encode, DecodeConfig};
use crate::error::CodecError;
use crate::request::Request;
use crate::value::Value;

/// Decodes one top-level object per item; encodes requests and values.
#[derive(Debug, Clone, Default)]
pub struct ObjectCodec {
    config: DecodeConfig,
}

impl ObjectCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }
}

impl Decoder for ObjectCodec {
    type Item = Value;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Value>, CodecError> {
        match decode_one(src, &self.config)? {
            Some((value, used)) => {
                src.advance(used);
                Ok(Some(value))
            }
            None => {
                self.config.check_pending(src.len())?;
                Ok(None)
            }
        }
    }
}

impl Encoder<Value> for ObjectCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Value, dst: &mut BytesMut) -> Result<(), CodecError> {
        encode(&item, dst);
        Ok(())
    }
}

impl Encoder<Request> for ObjectCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Request, dst: &mut BytesMut) -> Result<(), CodecError> {
        item.encode(dst);
        Ok(())
    }
}
