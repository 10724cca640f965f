//! In-memory transport for exercising the engine without a server.

use super::transport::{ContinuationToken, Response, Target, Transport};
use super::ActivityError;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug)]
pub enum Reply {
    Body { body: String, next: Option<String> },
    Status(u16),
}

impl Reply {
    pub fn json(body: impl Into<String>) -> Self {
        Self::Body { body: body.into(), next: None }
    }

    pub fn json_with_next(body: impl Into<String>, next: impl Into<String>) -> Self {
        Self::Body {
            body: body.into(),
            next: Some(next.into()),
        }
    }

    pub const fn status(code: u16) -> Self {
        Self::Status(code)
    }
}

/// Replies are keyed by endpoint path (first pages) or by token (continuation pages) and
/// consumed in order. An unscripted request panics.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, key: &str, reply: Reply) -> Self {
        self.script.lock().unwrap().entry(key.to_string()).or_default().push_back(reply);
        self
    }

    /// Keys of every request issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Full request descriptions (path and query) of every first-page request.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, target: Target<'_>) -> Result<Response, ActivityError> {
        let key = match target {
            Target::Endpoint(endpoint) => {
                self.requests.lock().unwrap().push(endpoint.to_string());
                endpoint.path().to_string()
            }
            Target::Continuation(token) => token.as_str().to_string(),
        };
        self.calls.lock().unwrap().push(key.clone());

        let reply = self
            .script
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("unexpected request for '{key}'"));

        match reply {
            Reply::Body { body, next } => Ok(Response {
                body: body.into_bytes(),
                next: next.map(ContinuationToken::new),
            }),
            Reply::Status(code) => Err(ActivityError::ServerError {
                status: Some(code),
                detail: format!("HTTP {code} from {key}"),
            }),
        }
    }
}
