use std::path::Path;

use replwire_codec::Request;
use tracing::debug;

use crate::client::Client;
use crate::error::Result;
use crate::response::Response;

pub const OP_EVAL: &str = "eval";
pub const OP_LOAD_FILE: &str = "load-file";
pub const OP_COMPLETE: &str = "complete";
pub const OP_INFO: &str = "info";
pub const OP_STACKTRACE: &str = "stacktrace";
pub const OP_TEST: &str = "test";
pub const OP_TEST_ALL: &str = "test-all";
pub const OP_DESCRIBE: &str = "describe";
pub const OP_INTERRUPT: &str = "interrupt";

impl Client {
    /// Evaluate `code` in a fresh session cloned from `session` (or from a
    /// new root when `None`).
    ///
    /// The caller's session is never evaluated in directly; the id actually
    /// used comes back in each response's `session` key.
    pub async fn evaluate(&self, code: &str, session: Option<&str>) -> Result<Vec<Response>> {
        let child = self.clone_session(session).await?;
        debug!(session = %child, "evaluating");
        let request = Request::new(OP_EVAL)
            .field("code", code)
            .field("session", child);
        self.send(request).await
    }

    /// Load a file's contents in a fresh cloned session.
    ///
    /// `path` is only reported to the remote (for error locations); the core
    /// never reads it.
    pub async fn evaluate_file(
        &self,
        code: &str,
        path: &Path,
        session: Option<&str>,
    ) -> Result<Vec<Response>> {
        let child = self.clone_session(session).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let request = Request::new(OP_LOAD_FILE)
            .field("file", code)
            .field("file-path", path.to_string_lossy().into_owned())
            .field_opt("file-name", file_name)
            .field("session", child);
        self.send(request).await
    }

    /// Completion candidates for `symbol`.
    pub async fn complete(
        &self,
        symbol: &str,
        ns: Option<&str>,
        session: Option<&str>,
    ) -> Result<Response> {
        let request = Request::new(OP_COMPLETE)
            .field("symbol", symbol)
            .field_opt("ns", ns)
            .field_opt("session", session);
        self.first(request).await
    }

    /// Documentation and source location for `symbol`.
    pub async fn info(
        &self,
        symbol: &str,
        ns: Option<&str>,
        session: Option<&str>,
    ) -> Result<Response> {
        let request = Request::new(OP_INFO)
            .field("symbol", symbol)
            .field_opt("ns", ns)
            .field_opt("session", session);
        self.first(request).await
    }

    /// Stacktrace of the last exception in `session`.
    pub async fn stacktrace(&self, session: &str) -> Result<Vec<Response>> {
        self.send(Request::new(OP_STACKTRACE).field("session", session))
            .await
    }

    /// Run tests for `ns`, or every loaded namespace when `None`. Namespaces
    /// are (re)loaded first.
    pub async fn run_tests(&self, ns: Option<&str>) -> Result<Vec<Response>> {
        let op = if ns.is_some() { OP_TEST } else { OP_TEST_ALL };
        let request = Request::new(op).field_opt("ns", ns).field("load?", true);
        self.send(request).await
    }

    /// Server capabilities: supported ops and versions.
    pub async fn describe(&self) -> Result<Response> {
        self.first(Request::new(OP_DESCRIBE)).await
    }

    /// Interrupt the evaluation `interrupt_id` (or whatever is running) in
    /// `session`.
    pub async fn interrupt(
        &self,
        session: &str,
        interrupt_id: Option<&str>,
    ) -> Result<Vec<Response>> {
        let request = Request::new(OP_INTERRUPT)
            .field("session", session)
            .field_opt("interrupt-id", interrupt_id);
        self.send(request).await
    }

    /// `send` only resolves once the `done` object has arrived, so the
    /// list always holds at least that object.
    async fn first(&self, request: Request) -> Result<Response> {
        Ok(self.send(request).await?.into_iter().next().unwrap_or_default())
    }
}
