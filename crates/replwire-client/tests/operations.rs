mod common;

use std::path::Path;

use replwire_client::{
    Client, ClientError, Completion, EvalSummary, StackFrame, SymbolInfo, TestSummary,
};
use replwire_codec::Value;

use common::{dict, done, FakeServer, Reply};

fn text<'a>(request: &'a Value, key: &str) -> Option<&'a str> {
    request.get(key).and_then(Value::as_str)
}

#[tokio::test]
async fn each_evaluation_gets_its_own_session() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    let first = client.evaluate("(+ 1 2)", None).await.unwrap();
    let second = client.evaluate("(+ 1 2)", None).await.unwrap();

    let clones = server.requests_for("clone");
    assert_eq!(clones.len(), 2);
    assert!(clones.iter().all(|c| c.get("session").is_none()));

    let evals = server.requests_for("eval");
    assert_eq!(text(&evals[0], "session"), Some("session-1"));
    assert_eq!(text(&evals[1], "session"), Some("session-2"));

    assert_eq!(EvalSummary::from_responses(&first).session.as_deref(), Some("session-1"));
    assert_eq!(EvalSummary::from_responses(&second).values, vec!["3"]);
}

#[tokio::test]
async fn evaluation_clones_from_the_given_parent() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    client.evaluate("(def x 1)", Some("parent")).await.unwrap();

    let clone = &server.requests_for("clone")[0];
    assert_eq!(text(clone, "session"), Some("parent"));
    let eval = &server.requests_for("eval")[0];
    assert_eq!(text(eval, "session"), Some("session-1"));
    assert_eq!(text(eval, "code"), Some("(def x 1)"));
}

#[tokio::test]
async fn evaluation_errors_are_reported_in_responses() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    let responses = client.evaluate("(/ 1 0)", None).await.unwrap();
    let summary = EvalSummary::from_responses(&responses);

    assert!(summary.failed);
    assert_eq!(summary.err, "Divide by zero\n");
    assert!(summary.ex.unwrap().contains("ArithmeticException"));
}

#[tokio::test]
async fn failed_clone_stops_evaluation() {
    let server = FakeServer::start(|_| Reply::Objects(vec![done()])).await;
    let client = Client::for_endpoint(server.descriptor());

    let err = client.evaluate("(+ 1 2)", None).await.unwrap_err();
    assert!(matches!(err, ClientError::NoSession));
    assert!(server.requests_for("eval").is_empty());
}

#[tokio::test]
async fn load_file_sends_contents_and_location() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    let responses = client
        .evaluate_file("(ns app.core)", Path::new("src/app/core.clj"), None)
        .await
        .unwrap();
    assert_eq!(
        EvalSummary::from_responses(&responses).values,
        vec!["#'app.core/main"]
    );

    let load = &server.requests_for("load-file")[0];
    assert_eq!(text(load, "file"), Some("(ns app.core)"));
    assert_eq!(text(load, "file-path"), Some("src/app/core.clj"));
    assert_eq!(text(load, "file-name"), Some("core.clj"));
    assert_eq!(text(load, "session"), Some("session-1"));
}

#[tokio::test]
async fn complete_returns_first_response() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    let response = client.complete("ma", Some("user"), None).await.unwrap();
    let candidates: Vec<String> = Completion::from_response(&response)
        .into_iter()
        .map(|c| c.candidate)
        .collect();
    assert_eq!(candidates, vec!["ma-a", "ma-b"]);

    let request = &server.requests_for("complete")[0];
    assert_eq!(text(request, "symbol"), Some("ma"));
    assert_eq!(text(request, "ns"), Some("user"));
    assert!(request.get("session").is_none());
}

#[tokio::test]
async fn info_describes_symbol() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    let response = client.info("map", Some("clojure.core"), Some("s1")).await.unwrap();
    let info = SymbolInfo::from_response(&response).expect("symbol info");
    assert_eq!(info.name.as_deref(), Some("map"));
    assert_eq!(info.ns.as_deref(), Some("clojure.core"));
    assert_eq!(info.line, Some(10));

    let request = &server.requests_for("info")[0];
    assert_eq!(text(request, "session"), Some("s1"));
}

#[tokio::test]
async fn lone_done_object_is_the_first_response() {
    let server = FakeServer::start(|_| Reply::Objects(vec![done()])).await;
    let client = Client::for_endpoint(server.descriptor());

    let response = client.describe().await.unwrap();
    assert!(response.is_done());
    let response = client.complete("ma", None, None).await.unwrap();
    assert!(response.is_done());
    assert!(Completion::from_response(&response).is_empty());
}

#[tokio::test]
async fn stacktrace_collects_frames() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    let responses = client.stacktrace("s1").await.unwrap();
    let frames = StackFrame::from_responses(&responses);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].method.as_deref(), Some("divide"));
    assert!(frames[0].has_flag("java"));

    let request = &server.requests_for("stacktrace")[0];
    assert_eq!(text(request, "session"), Some("s1"));
}

#[tokio::test]
async fn tests_run_for_namespace_or_everything() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    let one = client.run_tests(Some("app.core-test")).await.unwrap();
    let all = client.run_tests(None).await.unwrap();

    let summary = TestSummary::from_responses(&one).unwrap();
    assert_eq!(summary.pass, 5);
    assert!(summary.is_success());
    assert!(TestSummary::from_responses(&all).is_some());

    let test = &server.requests_for("test")[0];
    assert_eq!(text(test, "ns"), Some("app.core-test"));
    assert_eq!(test.get("load?").and_then(Value::as_int), Some(1));

    let test_all = &server.requests_for("test-all")[0];
    assert!(test_all.get("ns").is_none());
    assert_eq!(test_all.get("load?").and_then(Value::as_int), Some(1));
}

#[tokio::test]
async fn list_sessions_returns_ids() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());
    assert_eq!(client.list_sessions().await.unwrap(), vec!["s1", "s2"]);
}

#[tokio::test]
async fn list_sessions_without_list_is_an_error() {
    let server = FakeServer::start(|_| Reply::Objects(vec![done()])).await;
    let client = Client::for_endpoint(server.descriptor());
    assert!(matches!(
        client.list_sessions().await,
        Err(ClientError::NoSessions)
    ));
}

#[tokio::test]
async fn close_and_interrupt_target_session() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    client.close_session(Some("s1")).await.unwrap();
    client.interrupt("s2", Some("42")).await.unwrap();

    assert_eq!(text(&server.requests_for("close")[0], "session"), Some("s1"));
    let interrupt = &server.requests_for("interrupt")[0];
    assert_eq!(text(interrupt, "session"), Some("s2"));
    assert_eq!(text(interrupt, "interrupt-id"), Some("42"));
}

#[tokio::test]
async fn describe_lists_ops() {
    let server = FakeServer::nrepl().await;
    let client = Client::for_endpoint(server.descriptor());

    let response = client.describe().await.unwrap();
    let ops = response.get("ops").and_then(Value::as_dict).unwrap();
    assert!(ops.contains_key("eval"));
    assert!(ops.contains_key("clone"));
}

#[tokio::test]
async fn explicit_endpoint_wins_over_current_connection() {
    let current = FakeServer::nrepl().await;
    let explicit = FakeServer::start(|request: &Value| {
        Reply::Objects(vec![dict(&[
            ("sessions", Value::from(vec!["explicit"])),
            ("status", Value::from(vec!["done"])),
            ("id", request.get("id").cloned().unwrap_or(Value::from(""))),
        ])])
    })
    .await;

    let client = Client::for_endpoint(current.descriptor()).with_endpoint(explicit.descriptor());
    assert_eq!(client.list_sessions().await.unwrap(), vec!["explicit"]);
    assert_eq!(current.connections(), 0);
    assert_eq!(explicit.connections(), 1);
}
