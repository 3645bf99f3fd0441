use std::collections::BTreeMap;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CodecError, Result};
use crate::value::Value;

/// Default maximum declared byte-string length: 16 MiB.
pub const DEFAULT_MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// Default maximum list/dict nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default maximum undecoded bytes held while waiting for an object to
/// complete: 64 MiB.
pub const DEFAULT_MAX_PENDING: usize = 64 * 1024 * 1024;

/// Longest digit run accepted for an integer or a length prefix.
const MAX_DIGITS: usize = 20;

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Maximum declared byte-string length. Default: 16 MiB.
    pub max_string_len: usize,
    /// Maximum list/dict nesting depth. Default: 128.
    pub max_depth: usize,
    /// Maximum bytes buffered for an object that has not completed yet.
    /// Checked by the streaming readers. Default: 64 MiB.
    pub max_pending: usize,
}

impl DecodeConfig {
    /// Fail once `pending` undecoded bytes exceed `max_pending`.
    pub fn check_pending(&self, pending: usize) -> Result<()> {
        if pending > self.max_pending {
            return Err(CodecError::TooLarge {
                size: pending,
                max: self.max_pending,
            });
        }
        Ok(())
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            max_pending: DEFAULT_MAX_PENDING,
        }
    }
}

/// Encode a value into bencode.
///
/// Wire format:
/// ```text
/// integer      i<decimal>e          i42e, i-7e
/// byte string  <len>:<bytes>        4:eval
/// list         l<items>e            l4:done e
/// dict         d<key><value>...e    d2:op5:clonee
/// ```
///
/// Dict entries are written in key order.
pub fn encode(value: &Value, dst: &mut BytesMut) {
    match value {
        Value::Int(n) => put_int(*n, dst),
        Value::Bytes(b) => put_bytes(b, dst),
        Value::List(items) => {
            dst.put_u8(b'l');
            for item in items {
                encode(item, dst);
            }
            dst.put_u8(b'e');
        }
        Value::Dict(map) => {
            dst.put_u8(b'd');
            for (k, v) in map {
                put_bytes(k.as_bytes(), dst);
                encode(v, dst);
            }
            dst.put_u8(b'e');
        }
    }
}

/// Encode a value into a fresh buffer.
pub fn to_bytes(value: &Value) -> Bytes {
    let mut buf = BytesMut::new();
    encode(value, &mut buf);
    buf.freeze()
}

pub(crate) fn put_int(n: i64, dst: &mut BytesMut) {
    dst.put_u8(b'i');
    dst.put_slice(n.to_string().as_bytes());
    dst.put_u8(b'e');
}

pub(crate) fn put_bytes(bytes: &[u8], dst: &mut BytesMut) {
    dst.reserve(bytes.len() + MAX_DIGITS + 1);
    dst.put_slice(bytes.len().to_string().as_bytes());
    dst.put_u8(b':');
    dst.put_slice(bytes);
}

/// Complete objects found at the front of a buffer.
#[derive(Debug)]
pub struct Decoded<'a> {
    /// Top-level objects in arrival order.
    pub objects: Vec<Value>,
    /// Trailing bytes that do not yet form a complete object.
    pub remainder: &'a [u8],
}

impl Decoded<'_> {
    /// Number of bytes taken from the front of the input.
    pub fn consumed(&self, input_len: usize) -> usize {
        input_len - self.remainder.len()
    }
}

/// Decode every complete top-level object at the front of `buf`.
///
/// A truncated trailing object is not an error: its bytes come back as
/// `remainder`, to be prepended to the next chunk. No state is kept between
/// calls.
pub fn decode_objects(buf: &[u8]) -> Result<Decoded<'_>> {
    decode_objects_with_config(buf, &DecodeConfig::default())
}

/// [`decode_objects`] with explicit limits.
pub fn decode_objects_with_config<'a>(buf: &'a [u8], config: &DecodeConfig) -> Result<Decoded<'a>> {
    let mut objects = Vec::new();
    let mut consumed = 0usize;

    while consumed < buf.len() {
        let mut parser = Parser::new(buf, consumed, config);
        match parser.value(0)? {
            Some(value) => {
                objects.push(value);
                consumed = parser.pos;
            }
            None => break,
        }
    }

    Ok(Decoded {
        objects,
        remainder: &buf[consumed..],
    })
}

/// Decode a single object from the front of `buf`.
///
/// Returns the object and the number of bytes it occupied, or `Ok(None)` if
/// the buffer does not hold a complete object yet.
pub fn decode_one(buf: &[u8], config: &DecodeConfig) -> Result<Option<(Value, usize)>> {
    if buf.is_empty() {
        return Ok(None);
    }
    let mut parser = Parser::new(buf, 0, config);
    Ok(parser.value(0)?.map(|value| (value, parser.pos)))
}

struct Parser<'a> {
    buf: &'a [u8],
    pos: usize,
    config: &'a DecodeConfig,
}

impl<'a> Parser<'a> {
    fn new(buf: &'a [u8], pos: usize, config: &'a DecodeConfig) -> Self {
        Self { buf, pos, config }
    }

    fn malformed(&self, reason: &'static str) -> CodecError {
        CodecError::Malformed {
            offset: self.pos,
            reason,
        }
    }

    /// `Ok(None)` means the input ended before the value did.
    fn value(&mut self, depth: usize) -> Result<Option<Value>> {
        let Some(&tag) = self.buf.get(self.pos) else {
            return Ok(None);
        };

        match tag {
            b'i' => Ok(self.int()?.map(Value::Int)),
            b'0'..=b'9' => Ok(self.byte_string()?.map(Value::Bytes)),
            b'l' => self.list(depth),
            b'd' => self.dict(depth),
            _ => Err(self.malformed("unexpected byte at start of value")),
        }
    }

    fn int(&mut self) -> Result<Option<i64>> {
        let start = self.pos + 1;
        let mut end = start;
        loop {
            match self.buf.get(end) {
                None => {
                    if end - start > MAX_DIGITS {
                        return Err(self.malformed("integer too long"));
                    }
                    return Ok(None);
                }
                Some(b'e') => break,
                Some(b'-') if end == start => end += 1,
                Some(b) if b.is_ascii_digit() => end += 1,
                Some(_) => {
                    self.pos = end;
                    return Err(self.malformed("invalid byte in integer"));
                }
            }
        }

        // Only ASCII digits and a leading '-' reach this point.
        let text = std::str::from_utf8(&self.buf[start..end])
            .map_err(|_| self.malformed("invalid byte in integer"))?;
        let n = text
            .parse::<i64>()
            .map_err(|_| self.malformed("integer out of range or empty"))?;
        self.pos = end + 1;
        Ok(Some(n))
    }

    fn byte_string(&mut self) -> Result<Option<Bytes>> {
        let start = self.pos;
        let mut colon = start;
        loop {
            match self.buf.get(colon) {
                None => {
                    if colon - start > MAX_DIGITS {
                        return Err(self.malformed("byte string length too long"));
                    }
                    return Ok(None);
                }
                Some(b':') => break,
                Some(b) if b.is_ascii_digit() => colon += 1,
                Some(_) => {
                    self.pos = colon;
                    return Err(self.malformed("invalid byte in byte string length"));
                }
            }
        }

        if colon - start > MAX_DIGITS {
            return Err(self.malformed("byte string length too long"));
        }
        let len: usize = std::str::from_utf8(&self.buf[start..colon])
            .ok()
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| self.malformed("byte string length out of range"))?;

        if len > self.config.max_string_len {
            return Err(CodecError::TooLarge {
                size: len,
                max: self.config.max_string_len,
            });
        }

        let body = colon + 1;
        let end = body + len;
        if end > self.buf.len() {
            return Ok(None);
        }

        self.pos = end;
        Ok(Some(Bytes::copy_from_slice(&self.buf[body..end])))
    }

    fn list(&mut self, depth: usize) -> Result<Option<Value>> {
        self.enter(depth)?;
        self.pos += 1;

        let mut items = Vec::new();
        loop {
            match self.buf.get(self.pos) {
                None => return Ok(None),
                Some(b'e') => {
                    self.pos += 1;
                    return Ok(Some(Value::List(items)));
                }
                Some(_) => match self.value(depth + 1)? {
                    Some(item) => items.push(item),
                    None => return Ok(None),
                },
            }
        }
    }

    fn dict(&mut self, depth: usize) -> Result<Option<Value>> {
        self.enter(depth)?;
        self.pos += 1;

        let mut map = BTreeMap::new();
        loop {
            let key = match self.buf.get(self.pos) {
                None => return Ok(None),
                Some(b'e') => {
                    self.pos += 1;
                    return Ok(Some(Value::Dict(map)));
                }
                Some(b) if b.is_ascii_digit() => match self.byte_string()? {
                    Some(key) => String::from_utf8_lossy(&key).into_owned(),
                    None => return Ok(None),
                },
                Some(_) => return Err(self.malformed("dict key must be a byte string")),
            };

            match self.value(depth + 1)? {
                Some(value) => {
                    map.insert(key, value);
                }
                None => return Ok(None),
            }
        }
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.config.max_depth {
            return Err(CodecError::TooDeep {
                max: self.config.max_depth,
            });
        }
        Ok(())
    }
}
