//! Recording fake transport
//!
//! Replays canned responses keyed by `(path, method)` and keeps an ordered
//! log of every request it receives, so tests can assert on exactly what a
//! manager sent.

use super::error::{Error, Result};
use super::transport::{Headers, Method, Response, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Canned responses: path -> method -> response
pub type Fixtures = HashMap<String, HashMap<Method, Response>>;

/// One recorded request
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub headers: Headers,
    pub body: Option<Value>,
}

impl Call {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: Headers,
        body: Option<Value>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    fixtures: Fixtures,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            fixtures,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register a canned response, replacing any previous one for the route
    pub fn with_fixture(
        mut self,
        path: impl Into<String>,
        method: Method,
        headers: Headers,
        body: Option<Value>,
    ) -> Self {
        self.fixtures
            .entry(path.into())
            .or_default()
            .insert(method, Response::new(headers, body));
        self
    }

    /// Snapshot of the call log, oldest first
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        headers: &Headers,
        body: Option<&Value>,
    ) -> Result<Response> {
        tracing::debug!("fake {} {}", method, path);

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Call::new(method, path, headers.clone(), body.cloned()));

        self.fixtures
            .get(path)
            .and_then(|routes| routes.get(&method))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                method,
                path: path.to_string(),
            })
    }
}
