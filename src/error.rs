//! Error types
//!
//! Remote failures surface as [`FetchError`], client-side precondition
//! failures as [`ValidationError`]. The CRUD controller wraps both in
//! [`CrudError`] together with its own gating failures.

use thiserror::Error;

/// Network or HTTP failure talking to the catalog API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
    /// HTTP status, if a response was received
    pub status: Option<u16>,
    pub message: String,
}

impl FetchError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Failure before any response was received (connect, timeout, ...)
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        self.status.is_none() && self.message.contains("timed out")
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Could not connect to the catalog API".to_string()
        } else if err.is_decode() {
            "Failed to parse response JSON".to_string()
        } else {
            format!("Request failed: {}", err)
        };
        Self { status, message }
    }
}

/// Client-side precondition failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn required(field: &str) -> Self {
        Self(format!("{} is required", field))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Error returned by CRUD controller operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CrudError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Another mutating operation is in flight for the same table
    #[error("Another operation is still in progress")]
    Busy,
    #[error("Read-only mode: actions are disabled")]
    ReadOnly,
}

impl CrudError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch(e) => e.status,
            _ => None,
        }
    }
}

/// Format an API error for the status line.
///
/// Raw server bodies are never shown; the status code picks a short message.
pub fn format_api_error(error: &FetchError) -> String {
    match error.status {
        Some(400) => "Invalid request. Check the form values.".to_string(),
        Some(404) => "Resource not found.".to_string(),
        Some(409) => "Resource conflict. It may already exist or still be referenced.".to_string(),
        Some(413) => "Upload too large.".to_string(),
        Some(422) => "The server rejected the submitted data.".to_string(),
        Some(s) if s >= 500 => "Catalog service temporarily unavailable. Please try again.".to_string(),
        Some(s) => format!("Request failed with status {}.", s),
        None => {
            let sanitized: String = error
                .message
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect();
            if sanitized.len() < error.message.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        },
    }
}
