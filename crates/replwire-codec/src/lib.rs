//! Streaming bencode for nREPL-style traffic.
//!
//! TCP has no message boundaries, so responses arrive split, merged, or
//! pipelined. This crate turns bytes into whole objects:
//! - [`decode_objects`] takes a buffer and returns every complete top-level
//!   object plus the undecoded remainder. It keeps no state.
//! - [`ObjectReader`] / [`ObjectWriter`] wrap async streams around that.
//! - `ObjectCodec` plugs the same logic into `tokio_util::codec` (behind the
//!   `framed` feature).
//!
//! Byte strings are length-prefixed, so decoding follows declared lengths and
//! never looks for delimiters inside payloads.

pub mod codec;
pub mod error;
#[cfg(feature = "framed")]
pub mod framed;
pub mod reader;
pub mod request;
pub mod value;
pub mod writer;

pub use codec::{
    decode_objects, decode_objects_with_config, decode_one, encode, to_bytes, DecodeConfig,
    Decoded, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PENDING, DEFAULT_MAX_STRING_LEN,
};
pub use error::{CodecError, Result};
#[cfg(feature = "framed")]
pub use framed::ObjectCodec;
pub use reader::ObjectReader;
pub use request::{Request, OP_KEY};
pub use value::Value;
pub use writer::ObjectWriter;
