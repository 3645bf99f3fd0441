use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{encode, put_bytes};
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Key naming the operation; present on every request.
pub const OP_KEY: &str = "op";

/// An outgoing request: an ordered map that always carries `op`.
///
/// Fields are encoded in insertion order. Absent values never make it into
/// the map, so they are never sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    fields: Vec<(String, Value)>,
}

impl Request {
    /// Start a request for `op`.
    pub fn new(op: impl Into<String>) -> Self {
        Self {
            fields: vec![(OP_KEY.to_string(), Value::from(op.into()))],
        }
    }

    /// The operation name.
    pub fn op(&self) -> &str {
        self.get(OP_KEY).and_then(Value::as_str).unwrap_or_default()
    }

    /// Set `key`, replacing any earlier value.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` when `value` is present; otherwise make sure `key` is absent.
    pub fn field_opt<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        let key = key.into();
        match value {
            Some(value) => self.set(key, value),
            None => self.remove(&key),
        }
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Drop `key`. The `op` key cannot be removed.
    pub fn remove(&mut self, key: &str) {
        if key != OP_KEY {
            self.fields.retain(|(k, _)| k != key);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in encoding order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Append the bencoded request to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(b'd');
        for (key, value) in &self.fields {
            put_bytes(key.as_bytes(), dst);
            encode(value, dst);
        }
        dst.put_u8(b'e');
    }

    /// The bencoded request in a fresh buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }

    /// The request as a dict value (keys re-sorted).
    pub fn to_value(&self) -> Value {
        Value::Dict(self.fields.iter().cloned().collect())
    }

    /// Build a request from a JSON object such as `{"op": "describe"}`.
    ///
    /// Values must be bencode-representable; floats and nulls are rejected.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(CodecError::InvalidRequest(
                "request must be a JSON object".to_string(),
            ));
        };

        let op = match map.get(OP_KEY) {
            Some(serde_json::Value::String(op)) if !op.is_empty() => op.clone(),
            _ => {
                return Err(CodecError::InvalidRequest(
                    "request needs a non-empty string \"op\"".to_string(),
                ))
            }
        };

        let mut request = Request::new(op);
        for (key, value) in map {
            if key == OP_KEY {
                continue;
            }
            request.set(key, Value::try_from(value)?);
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_objects;

    #[test]
    fn absent_fields_are_never_encoded() {
        let request = Request::new("eval")
            .field("code", "(+ 1 2)")
            .field_opt("session", None::<String>);

        assert!(!request.contains_key("session"));
        assert_eq!(request.to_bytes().as_ref(), b"d2:op4:eval4:code7:(+ 1 2)e");
    }

    #[test]
    fn field_opt_clears_previous_value() {
        let request = Request::new("eval")
            .field("session", "old")
            .field_opt("session", None::<&str>);
        assert_eq!(request.keys().collect::<Vec<_>>(), vec!["op"]);
    }

    #[test]
    fn insertion_order_and_replacement() {
        let request = Request::new("load-file")
            .field("file", "(ns a)")
            .field("file-path", "/src/a.clj")
            .field("file", "(ns b)");
        assert_eq!(
            request.keys().collect::<Vec<_>>(),
            vec!["op", "file", "file-path"]
        );
        assert_eq!(request.get("file").and_then(Value::as_str), Some("(ns b)"));
    }

    #[test]
    fn op_is_not_removable() {
        let mut request = Request::new("describe");
        request.remove(OP_KEY);
        assert_eq!(request.op(), "describe");
    }

    #[test]
    fn encoded_request_decodes_to_same_map() {
        let request = Request::new("test")
            .field("ns", "app.core-test")
            .field("load?", true)
            .field("tests", vec!["a", "b"]);

        let wire = request.to_bytes();
        let decoded = decode_objects(&wire).unwrap();
        assert_eq!(decoded.objects, vec![request.to_value()]);
        assert!(decoded.remainder.is_empty());
    }

    #[test]
    fn from_json_requires_op_and_supported_values() {
        let ok = Request::from_json(serde_json::json!({"op": "describe", "verbose?": true})).unwrap();
        assert_eq!(ok.op(), "describe");
        assert_eq!(ok.get("verbose?").and_then(Value::as_int), Some(1));

        let no_op = Request::from_json(serde_json::json!({"code": "1"}));
        assert!(matches!(no_op, Err(CodecError::InvalidRequest(_))));

        let not_object = Request::from_json(serde_json::json!(["op"]));
        assert!(matches!(not_object, Err(CodecError::InvalidRequest(_))));

        let float = Request::from_json(serde_json::json!({"op": "eval", "x": 0.5}));
        assert!(matches!(float, Err(CodecError::Unsupported(_))));
    }
}
