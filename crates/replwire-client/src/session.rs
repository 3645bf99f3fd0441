use replwire_codec::Request;
use tracing::debug;

use crate::client::Client;
use crate::error::{ClientError, Result};
use crate::response::Response;

pub const OP_CLONE: &str = "clone";
pub const OP_CLOSE: &str = "close";
pub const OP_LS_SESSIONS: &str = "ls-sessions";

impl Client {
    /// Create a session, as a child of `parent` when given.
    pub async fn clone_session(&self, parent: Option<&str>) -> Result<String> {
        let request = Request::new(OP_CLONE).field_opt("session", parent);
        let responses = self.send(request).await?;
        let session = new_session_from(&responses)?;
        debug!(%session, parent = ?parent, "cloned session");
        Ok(session)
    }

    /// Close `session`. Best-effort: the responses are not inspected.
    pub async fn close_session(&self, session: Option<&str>) -> Result<Vec<Response>> {
        let request = Request::new(OP_CLOSE).field_opt("session", session);
        self.send(request).await
    }

    /// Ids of every session the remote knows about.
    pub async fn list_sessions(&self) -> Result<Vec<String>> {
        let responses = self.send(Request::new(OP_LS_SESSIONS)).await?;
        sessions_from(&responses)
    }
}

/// The first `new-session` in a clone reply.
pub(crate) fn new_session_from(responses: &[Response]) -> Result<String> {
    responses
        .iter()
        .find_map(Response::new_session)
        .map(str::to_string)
        .ok_or(ClientError::NoSession)
}

/// The session list of an ls-sessions reply; the first object must be done
/// and carry the list.
pub(crate) fn sessions_from(responses: &[Response]) -> Result<Vec<String>> {
    responses
        .first()
        .filter(|first| first.is_done())
        .and_then(Response::sessions)
        .ok_or(ClientError::NoSessions)
}
