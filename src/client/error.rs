//! Client errors

use super::transport::Method;
use thiserror::Error;

/// Errors returned by transports and resource managers
#[derive(Error, Debug)]
pub enum Error {
    /// No route for this request (fake transport) or HTTP 404 (real transport)
    #[error("Resource not found: {method} {path}")]
    NotFound { method: Method, path: String },

    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Empty response body from {method} {path}")]
    EmptyBody { method: Method, path: String },

    #[error("Response from {path} has no '{key}' list")]
    MissingKey { key: String, path: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    /// HTTP status code equivalent of the error, when there is one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::Http { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

const MAX_MESSAGE_CHARS: usize = 120;

/// Format a client error for display
///
/// Maps well-known statuses to short hints; raw service messages are
/// truncated and stripped of non-printable characters.
pub fn format_error(error: &Error) -> String {
    match error.status_code() {
        Some(401) => "Authentication failed. Check your auth token.".to_string(),
        Some(403) => "Permission denied.".to_string(),
        Some(404) => "Resource not found.".to_string(),
        Some(409) => {
            "Resource conflict. The resource may already exist or be locked.".to_string()
        }
        Some(503) => "Ironic service temporarily unavailable. Please try again.".to_string(),
        _ => {
            if let Error::Network(e) = error {
                if e.is_timeout() {
                    return "Request timed out.".to_string();
                }
                if e.is_connect() {
                    return "Could not connect to the Ironic API endpoint.".to_string();
                }
            }

            let printable: Vec<char> = error
                .to_string()
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .collect();

            if printable.len() > MAX_MESSAGE_CHARS {
                let truncated: String = printable[..MAX_MESSAGE_CHARS].iter().collect();
                format!("{}...", truncated)
            } else {
                printable.into_iter().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = Error::NotFound {
            method: Method::Get,
            path: "/v1/nodes/missing".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Resource not found: GET /v1/nodes/missing");
        assert_eq!(format_error(&err), "Resource not found.");
    }

    #[test]
    fn test_conflict_message() {
        let err = Error::Http {
            status: 409,
            message: "Node is locked".to_string(),
        };
        assert!(!err.is_not_found());
        assert!(format_error(&err).starts_with("Resource conflict"));
    }

    #[test]
    fn test_unknown_status_is_truncated() {
        let err = Error::Http {
            status: 400,
            message: "x".repeat(500),
        };
        let formatted = format_error(&err);
        assert!(formatted.ends_with("..."));
        assert_eq!(formatted.len(), MAX_MESSAGE_CHARS + 3);
    }

    #[test]
    fn test_stripped_short_message_has_no_ellipsis() {
        let err = Error::Http {
            status: 400,
            message: "Invalid driver\nname é".to_string(),
        };
        assert_eq!(format_error(&err), "HTTP error: 400 - Invalid drivername ");
    }

    #[test]
    fn test_message_at_limit_is_kept_whole() {
        let prefix = "HTTP error: 400 - ";
        let err = Error::Http {
            status: 400,
            message: "x".repeat(MAX_MESSAGE_CHARS - prefix.len()),
        };
        let formatted = format_error(&err);
        assert_eq!(formatted.len(), MAX_MESSAGE_CHARS);
        assert!(!formatted.ends_with("..."));
    }
}
