//! Transport abstraction
//!
//! Resource managers never talk to the network directly; they go through a
//! [`Transport`], which is either the real [`HttpTransport`](super::http::HttpTransport)
//! or the recording [`FakeTransport`](super::fake::FakeTransport).

use super::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Request/response headers
pub type Headers = BTreeMap<String, String>;

/// HTTP verbs used by the v1 API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A decoded response: headers plus an optional JSON body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub headers: Headers,
    pub body: Option<Value>,
}

impl Response {
    pub fn new(headers: Headers, body: Option<Value>) -> Self {
        Self { headers, body }
    }

    pub fn json(body: Value) -> Self {
        Self {
            headers: Headers::new(),
            body: Some(body),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Something that can carry one API request and return its response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single request against `path` (e.g. `/v1/nodes`)
    async fn request(
        &self,
        method: Method,
        path: &str,
        headers: &Headers,
        body: Option<&Value>,
    ) -> Result<Response>;

    async fn get(&self, path: &str, headers: &Headers) -> Result<Response> {
        self.request(Method::Get, path, headers, None).await
    }

    async fn post(&self, path: &str, headers: &Headers, body: Option<&Value>) -> Result<Response> {
        self.request(Method::Post, path, headers, body).await
    }

    async fn put(&self, path: &str, headers: &Headers, body: Option<&Value>) -> Result<Response> {
        self.request(Method::Put, path, headers, body).await
    }

    async fn patch(&self, path: &str, headers: &Headers, body: Option<&Value>) -> Result<Response> {
        self.request(Method::Patch, path, headers, body).await
    }

    async fn delete(&self, path: &str, headers: &Headers) -> Result<Response> {
        self.request(Method::Delete, path, headers, None).await
    }
}
