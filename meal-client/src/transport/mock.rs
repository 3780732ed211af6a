//! Scripted in-memory transport
//!
//! Replays a queue of canned outcomes in order and records every request it
//! receives, so tests can assert on call counts, URLs and auth headers
//! without a server.
//!
//! ```
//! use meal_client::transport::ScriptedTransport;
//! use http::StatusCode;
//!
//! let transport = ScriptedTransport::new();
//! transport.push_status(StatusCode::SERVICE_UNAVAILABLE);
//! transport.push_ok(serde_json::json!({"status": "ok", "timestamp": "now"}));
//! assert_eq!(transport.remaining(), 2);
//! assert_eq!(transport.calls(), 0);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use http::StatusCode;

use super::{PreparedRequest, RawResponse, Transport, TransportFailure};

#[derive(Debug)]
enum Scripted {
    Respond(RawResponse),
    Fail(TransportFailure),
    /// Never completes; used to exercise timeouts and cancellation
    Hang,
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<PreparedRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, step: Scripted) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(step);
        self
    }

    /// Respond with an arbitrary status and body
    pub fn push_response(&self, status: StatusCode, body: impl Into<String>) -> &Self {
        self.push(Scripted::Respond(RawResponse::new(status, body)))
    }

    /// Respond 200 with `{"success": true, "data": data}`
    pub fn push_ok(&self, data: serde_json::Value) -> &Self {
        let body = serde_json::json!({ "success": true, "data": data });
        self.push_response(StatusCode::OK, body.to_string())
    }

    /// Respond with a status and a JSON body
    pub fn push_json(&self, status: StatusCode, body: serde_json::Value) -> &Self {
        self.push_response(status, body.to_string())
    }

    /// Respond with a status and an empty body
    pub fn push_status(&self, status: StatusCode) -> &Self {
        self.push_response(status, "")
    }

    /// Fail without a response
    pub fn push_failure(&self, failure: TransportFailure) -> &Self {
        self.push(Scripted::Fail(failure))
    }

    /// Never answer
    pub fn push_hang(&self) -> &Self {
        self.push(Scripted::Hang)
    }

    /// Number of `send` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Outcomes not yet consumed
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let step = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match step {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(failure)) => Err(failure),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(TransportFailure::Other("script exhausted".into())),
        }
    }
}
