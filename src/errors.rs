//! Error types for the fixer API client

use std::fmt;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug)]
pub enum ClientError {
    /// HTTP request failed at the transport level (DNS, connect, timeout)
    Http(reqwest::Error),

    /// Backend answered with a non-2xx status
    Api { status: u16, status_text: String },

    /// Response body was not valid JSON for the expected shape
    Json(serde_json::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(err) => write!(f, "HTTP error: {}", err),
            // Consumers pattern-match on this exact message shape.
            ClientError::Api {
                status,
                status_text,
            } => write!(f, "API Error: {} {}", status, status_text),
            ClientError::Json(err) => write!(f, "JSON error: {}", err),
            ClientError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Http(err) => Some(err),
            ClientError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_format() {
        let err = ClientError::Api {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: 404 Not Found");
    }

    #[test]
    fn test_api_error_message_contains_status_and_text() {
        let err = ClientError::Api {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("Internal Server Error"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ClientError::Config("api_url cannot be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: api_url cannot be empty"
        );
    }
}
