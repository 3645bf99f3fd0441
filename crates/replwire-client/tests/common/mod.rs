//! Scripted nREPL-style server for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use replwire_codec::{to_bytes, ObjectCodec, Value};
use replwire_transport::ConnectionDescriptor;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_util::codec::FramedRead;

/// What the server does with one request.
pub enum Reply {
    /// Encode and write these objects, one write each.
    Objects(Vec<Value>),
    /// Write raw byte chunks, pausing between them.
    Chunks(Vec<Vec<u8>>),
    /// Close the socket without answering.
    Hangup,
    /// Keep the socket open and never answer.
    Silent,
}

pub type Handler = Arc<dyn Fn(&Value) -> Reply + Send + Sync>;

pub struct FakeServer {
    pub port: u16,
    requests: Arc<Mutex<Vec<Value>>>,
    connections: Arc<AtomicUsize>,
}

impl FakeServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Value) -> Reply + Send + Sync + 'static,
    {
        Self::serve(Arc::new(handler)).await
    }

    pub async fn serve(handler: Handler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("test listener should bind");
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&requests);
        let count = Arc::clone(&connections);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                count.fetch_add(1, Ordering::SeqCst);
                let handler = Arc::clone(&handler);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let (read_half, mut write_half) = stream.into_split();
                    let mut requests = FramedRead::new(read_half, ObjectCodec::new());
                    let Some(Ok(request)) = requests.next().await else {
                        return;
                    };
                    seen.lock().expect("request log").push(request.clone());

                    match handler(&request) {
                        Reply::Objects(objects) => {
                            for object in objects {
                                if write_half.write_all(&to_bytes(&object)).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Reply::Chunks(chunks) => {
                            for chunk in chunks {
                                if write_half.write_all(&chunk).await.is_err() {
                                    return;
                                }
                                let _ = write_half.flush().await;
                                tokio::time::sleep(Duration::from_millis(5)).await;
                            }
                        }
                        Reply::Hangup => return,
                        Reply::Silent => {}
                    }
                    let _ = write_half.flush().await;

                    // Hold the socket until the client hangs up.
                    while requests.next().await.is_some() {}
                });
            }
        });

        Self {
            port,
            requests,
            connections,
        }
    }

    /// Server behaving like a minimal nREPL.
    pub async fn nrepl() -> Self {
        Self::serve(nrepl_handler()).await
    }

    pub fn descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::localhost(self.port)
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().expect("request log").clone()
    }

    pub fn requests_for(&self, op: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.get("op").and_then(Value::as_str) == Some(op))
            .collect()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

pub fn dict(entries: &[(&str, Value)]) -> Value {
    Value::Dict(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

pub fn done() -> Value {
    dict(&[("status", Value::from(vec!["done"]))])
}

fn reply(request: &Value, mut entries: Vec<(&str, Value)>) -> Value {
    for key in ["id", "session"] {
        if let Some(v) = request.get(key) {
            if !entries.iter().any(|(k, _)| *k == key) {
                entries.push((key, v.clone()));
            }
        }
    }
    dict(&entries)
}

/// Handler for the ops the client uses; clones hand out `session-1`,
/// `session-2`, ...
pub fn nrepl_handler() -> Handler {
    let clones = Arc::new(AtomicUsize::new(0));
    Arc::new(move |request: &Value| {
        let op = request.get("op").and_then(Value::as_str).unwrap_or_default();
        let text = |key: &str| {
            request
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let done_reply = |request: &Value| reply(request, vec![("status", Value::from(vec!["done"]))]);

        match op {
            "clone" => {
                let n = clones.fetch_add(1, Ordering::SeqCst) + 1;
                Reply::Objects(vec![reply(
                    request,
                    vec![
                        ("new-session", Value::from(format!("session-{n}"))),
                        ("status", Value::from(vec!["done"])),
                    ],
                )])
            }
            "eval" => {
                let code = text("code");
                if code.contains("/ 1 0") {
                    return Reply::Objects(vec![
                        reply(
                            request,
                            vec![("err", Value::from("Divide by zero\n"))],
                        ),
                        reply(
                            request,
                            vec![
                                ("ex", Value::from("class java.lang.ArithmeticException")),
                                ("status", Value::from(vec!["eval-error"])),
                            ],
                        ),
                        done_reply(request),
                    ]);
                }
                Reply::Objects(vec![
                    reply(request, vec![("out", Value::from(format!("evaluating {code}\n")))]),
                    reply(
                        request,
                        vec![("value", Value::from("3")), ("ns", Value::from("user"))],
                    ),
                    done_reply(request),
                ])
            }
            "load-file" => Reply::Objects(vec![
                reply(request, vec![("value", Value::from("#'app.core/main"))]),
                done_reply(request),
            ]),
            "complete" => Reply::Objects(vec![reply(
                request,
                vec![
                    (
                        "completions",
                        Value::List(vec![
                            dict(&[
                                ("candidate", Value::from(format!("{}-a", text("symbol")))),
                                ("type", Value::from("function")),
                            ]),
                            dict(&[("candidate", Value::from(format!("{}-b", text("symbol"))))]),
                        ]),
                    ),
                    ("status", Value::from(vec!["done"])),
                ],
            )]),
            "info" => Reply::Objects(vec![reply(
                request,
                vec![
                    ("name", Value::from(text("symbol"))),
                    ("ns", Value::from(text("ns"))),
                    ("doc", Value::from("Docs.")),
                    ("line", Value::Int(10)),
                    ("status", Value::from(vec!["done"])),
                ],
            )]),
            "stacktrace" => Reply::Objects(vec![
                reply(
                    request,
                    vec![(
                        "stacktrace",
                        Value::List(vec![dict(&[
                            ("class", Value::from("clojure.lang.Numbers")),
                            ("method", Value::from("divide")),
                            ("file", Value::from("Numbers.java")),
                            ("line", Value::Int(188)),
                            ("flags", Value::from(vec!["java"])),
                        ])]),
                    )],
                ),
                done_reply(request),
            ]),
            "test" | "test-all" => Reply::Objects(vec![reply(
                request,
                vec![
                    (
                        "summary",
                        dict(&[
                            ("test", Value::Int(2)),
                            ("pass", Value::Int(5)),
                            ("fail", Value::Int(0)),
                            ("error", Value::Int(0)),
                        ]),
                    ),
                    ("status", Value::from(vec!["done"])),
                ],
            )]),
            "ls-sessions" => Reply::Objects(vec![reply(
                request,
                vec![
                    ("sessions", Value::from(vec!["s1", "s2"])),
                    ("status", Value::from(vec!["done"])),
                ],
            )]),
            "describe" => Reply::Objects(vec![reply(
                request,
                vec![
                    (
                        "ops",
                        dict(&[("eval", dict(&[])), ("clone", dict(&[]))]),
                    ),
                    ("status", Value::from(vec!["done"])),
                ],
            )]),
            "close" | "interrupt" => Reply::Objects(vec![done_reply(request)]),
            _ => Reply::Objects(vec![reply(
                request,
                vec![("status", Value::from(vec!["error", "unknown-op", "done"]))],
            )]),
        }
    })
}
