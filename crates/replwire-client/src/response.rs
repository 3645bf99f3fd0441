use std::collections::BTreeMap;

use replwire_codec::Value;
use serde::Serialize;

/// Status marker closing a response stream.
pub const STATUS_DONE: &str = "done";
/// Status added when evaluation raised.
pub const STATUS_EVAL_ERROR: &str = "eval-error";
/// Generic failure status.
pub const STATUS_ERROR: &str = "error";
/// The server does not implement the requested op.
pub const STATUS_UNKNOWN_OP: &str = "unknown-op";
/// The session named in the request does not exist.
pub const STATUS_UNKNOWN_SESSION: &str = "unknown-session";
/// An evaluation was interrupted.
pub const STATUS_INTERRUPTED: &str = "interrupted";

/// One decoded response object.
///
/// Which keys are present depends on the op; accessors return `None` when a
/// key is missing or has an unexpected shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Response {
    fields: BTreeMap<String, Value>,
}

impl Response {
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    /// Text items of a list-valued key.
    pub fn get_str_list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key)
            .filter(|v| v.as_list().is_some())
            .map(Value::str_items)
    }

    /// Entries of `status`, empty when absent.
    pub fn status(&self) -> Vec<&str> {
        self.get_str_list("status").unwrap_or_default()
    }

    pub fn has_status(&self, marker: &str) -> bool {
        self.status().contains(&marker)
    }

    /// True when this object closes its response stream.
    pub fn is_done(&self) -> bool {
        self.has_status(STATUS_DONE)
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    pub fn session(&self) -> Option<&str> {
        self.get_str("session")
    }

    pub fn new_session(&self) -> Option<&str> {
        self.get_str("new-session")
    }

    pub fn sessions(&self) -> Option<Vec<String>> {
        self.get_str_list("sessions")
            .map(|items| items.into_iter().map(str::to_string).collect())
    }

    pub fn value(&self) -> Option<&str> {
        self.get_str("value")
    }

    pub fn out(&self) -> Option<&str> {
        self.get_str("out")
    }

    pub fn err(&self) -> Option<&str> {
        self.get_str("err")
    }

    pub fn ns(&self) -> Option<&str> {
        self.get_str("ns")
    }

    pub fn ex(&self) -> Option<&str> {
        self.get_str("ex")
    }

    pub fn root_ex(&self) -> Option<&str> {
        self.get_str("root-ex")
    }

    pub fn into_value(self) -> Value {
        Value::Dict(self.fields)
    }
}

/// Only dicts are responses; anything else is handed back unchanged.
impl TryFrom<Value> for Response {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Dict(fields) => Ok(Response::new(fields)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
pub(crate) fn response(entries: &[(&str, Value)]) -> Response {
    Response::new(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}
