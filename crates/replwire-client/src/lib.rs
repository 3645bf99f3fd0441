//! Request/response correlation for nREPL-style evaluators.
//!
//! Each request gets its own socket. Responses are decoded as they arrive and
//! collected until one carries the `done` status; anything after that is
//! dropped. On top of that sit session management (`clone`, `close`,
//! `ls-sessions`) and typed operations (`eval`, `load-file`, `complete`,
//! `info`, `stacktrace`, `test`, `describe`, `interrupt`).
//!
//! ```no_run
//! # async fn demo() -> replwire_client::Result<()> {
//! use replwire_client::{Client, EvalSummary};
//! use replwire_transport::ConnectionDescriptor;
//!
//! let client = Client::for_endpoint(ConnectionDescriptor::localhost(7888));
//! let responses = client.evaluate("(+ 1 2)", None).await?;
//! let summary = EvalSummary::from_responses(&responses);
//! assert_eq!(summary.values, vec!["3"]);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod correlator;
pub mod error;
pub mod ops;
pub mod response;
pub mod session;
pub mod views;

pub use client::Client;
pub use config::ClientConfig;
pub use correlator::{Correlator, ResponseCollector};
pub use error::{ClientError, Result};
pub use ops::{
    OP_COMPLETE, OP_DESCRIBE, OP_EVAL, OP_INFO, OP_INTERRUPT, OP_LOAD_FILE, OP_STACKTRACE,
    OP_TEST, OP_TEST_ALL,
};
pub use response::{
    Response, STATUS_DONE, STATUS_ERROR, STATUS_EVAL_ERROR, STATUS_INTERRUPTED,
    STATUS_UNKNOWN_OP, STATUS_UNKNOWN_SESSION,
};
pub use session::{OP_CLONE, OP_CLOSE, OP_LS_SESSIONS};
pub use views::{Completion, EvalSummary, StackFrame, SymbolInfo, TestSummary};
