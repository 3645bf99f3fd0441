//! Caller-friendly views over raw response lists.

use replwire_codec::Value;
use serde::Serialize;

use crate::response::{Response, STATUS_EVAL_ERROR};

/// What an `eval` / `load-file` produced, folded across its responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvalSummary {
    /// Session the evaluation ran in.
    pub session: Option<String>,
    /// Printed result of each top-level form, in order.
    pub values: Vec<String>,
    /// Everything written to `*out*`.
    pub out: String,
    /// Everything written to `*err*`.
    pub err: String,
    /// Namespace after evaluation.
    pub ns: Option<String>,
    /// Exception class, when evaluation raised.
    pub ex: Option<String>,
    /// Root cause class, when evaluation raised.
    pub root_ex: Option<String>,
    /// True when any response carried `eval-error`.
    pub failed: bool,
}

impl EvalSummary {
    pub fn from_responses(responses: &[Response]) -> Self {
        let mut summary = Self::default();
        for response in responses {
            if summary.session.is_none() {
                summary.session = response.session().map(str::to_string);
            }
            if let Some(value) = response.value() {
                summary.values.push(value.to_string());
            }
            if let Some(out) = response.out() {
                summary.out.push_str(out);
            }
            if let Some(err) = response.err() {
                summary.err.push_str(err);
            }
            if let Some(ns) = response.ns() {
                summary.ns = Some(ns.to_string());
            }
            if let Some(ex) = response.ex() {
                summary.ex = Some(ex.to_string());
            }
            if let Some(root) = response.root_ex() {
                summary.root_ex = Some(root.to_string());
            }
            summary.failed |= response.has_status(STATUS_EVAL_ERROR);
        }
        summary
    }
}

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub candidate: String,
    pub ns: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Completion {
    /// Candidates from a `complete` response. Entries may be dicts with a
    /// `candidate` key or plain strings.
    pub fn from_response(response: &Response) -> Vec<Self> {
        let Some(items) = response.get("completions").and_then(Value::as_list) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::Dict(_) => Some(Completion {
                    candidate: item.get("candidate")?.as_str()?.to_string(),
                    ns: text(item, "ns"),
                    kind: text(item, "type"),
                }),
                other => other.as_str().map(|candidate| Completion {
                    candidate: candidate.to_string(),
                    ns: None,
                    kind: None,
                }),
            })
            .collect()
    }
}

/// Documentation and location for a symbol, from an `info` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolInfo {
    pub name: Option<String>,
    pub ns: Option<String>,
    pub doc: Option<String>,
    pub arglists: Option<String>,
    pub file: Option<String>,
    pub line: Option<i64>,
    pub column: Option<i64>,
    pub special_form: bool,
    /// Java class, for interop symbols.
    pub class: Option<String>,
    /// Java member, for interop symbols.
    pub member: Option<String>,
    pub message: Option<String>,
}

impl SymbolInfo {
    /// `None` when the response describes no symbol (`no-info` or empty).
    pub fn from_response(response: &Response) -> Option<Self> {
        let info = SymbolInfo {
            name: response.get_str("name").map(str::to_string),
            ns: response.ns().map(str::to_string),
            doc: response.get_str("doc").map(str::to_string),
            arglists: response.get_str("arglists-str").map(str::to_string),
            file: response.get_str("file").map(str::to_string),
            line: response.get_int("line"),
            column: response.get_int("column"),
            special_form: is_truthy(response.get("special-form")),
            class: response.get_str("class").map(str::to_string),
            member: response.get_str("member").map(str::to_string),
            message: response.get_str("message").map(str::to_string),
        };
        let empty = info.name.is_none() && info.class.is_none() && info.doc.is_none();
        (!empty).then_some(info)
    }
}

/// One frame of a `stacktrace` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub flags: Vec<String>,
    pub class: Option<String>,
    pub method: Option<String>,
    pub file: Option<String>,
    pub line: Option<i64>,
}

impl StackFrame {
    /// Frames from every exception cause in `responses`, outermost first.
    pub fn from_responses(responses: &[Response]) -> Vec<Self> {
        responses
            .iter()
            .filter_map(|r| r.get("stacktrace").and_then(Value::as_list))
            .flatten()
            .filter(|frame| frame.as_dict().is_some())
            .map(|frame| StackFrame {
                flags: frame
                    .get("flags")
                    .map(|f| f.str_items().into_iter().map(str::to_string).collect())
                    .unwrap_or_default(),
                class: text(frame, "class"),
                method: text(frame, "method"),
                file: text(frame, "file"),
                line: frame.get("line").and_then(Value::as_int),
            })
            .collect()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Counters from a `test` / `test-all` reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub test: i64,
    pub pass: i64,
    pub fail: i64,
    pub error: i64,
}

impl TestSummary {
    /// The first `summary` found, or `None` if no response carried one.
    pub fn from_responses(responses: &[Response]) -> Option<Self> {
        let summary = responses.iter().find_map(|r| r.get("summary"))?;
        let count = |key: &str| summary.get(key).and_then(Value::as_int).unwrap_or(0);
        Some(TestSummary {
            test: count("test"),
            pass: count("pass"),
            fail: count("fail"),
            error: count("error"),
        })
    }

    pub fn is_success(&self) -> bool {
        self.fail == 0 && self.error == 0
    }
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

// Servers send special-form as "true" or as a non-zero flag.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Int(n)) => *n != 0,
        Some(other) => other.as_str().is_some_and(|s| s == "true"),
        None => false,
    }
}
