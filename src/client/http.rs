//! HTTP transport for the Ironic REST API

use super::error::{Error, Result};
use super::transport::{Headers, Method, Response, Transport};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying the keystone token
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull a human readable message out of an Ironic error body.
///
/// The service wraps faults as `{"error_message": "<json string>"}` where the
/// inner document carries a `faultstring`; either layer may be missing.
pub fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return sanitize_for_log(body);
    };

    let Some(error_message) = value.get("error_message") else {
        return sanitize_for_log(body);
    };

    let inner = match error_message {
        Value::String(s) => serde_json::from_str::<Value>(s).unwrap_or(Value::String(s.clone())),
        other => other.clone(),
    };

    match &inner {
        Value::String(s) => sanitize_for_log(s),
        _ => inner
            .get("faultstring")
            .and_then(|v| v.as_str())
            .map(sanitize_for_log)
            .unwrap_or_else(|| sanitize_for_log(&inner.to_string())),
    }
}

/// Real transport backed by `reqwest`
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpTransport {
    /// Create a transport for `endpoint` (e.g. `http://ironic:6385`)
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|source| Error::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let client = Client::builder()
            .user_agent(concat!("ironic-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Join the endpoint with an API path, keeping any path prefix on the endpoint
    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        headers: &Headers,
        body: Option<&Value>,
    ) -> Result<Response> {
        let url = self.url_for(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.into(), &url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = &self.token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }

        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let response_headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let response_body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("{} {} not found", method, path);
            return Err(Error::NotFound {
                method,
                path: path.to_string(),
            });
        }

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(Error::Http {
                status: status.as_u16(),
                message: extract_error_message(&response_body),
            });
        }

        // Handle empty response
        if response_body.trim().is_empty() {
            return Ok(Response::new(response_headers, None));
        }

        let body = serde_json::from_str(&response_body).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })?;

        Ok(Response::new(response_headers, Some(body)))
    }
}
