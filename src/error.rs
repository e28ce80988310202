// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names the failure mode and where it happened, so callers
//! can decide between retrying, degrading, or surfacing the failure.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The external service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Anthropic,
    Notion,
    GoogleDrive,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::Notion => "Notion",
            Self::GoogleDrive => "Google Drive",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} API returned HTTP {status} for {url}: {body}")]
    HttpStatus {
        service: Service,
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },

    #[error("Malformed response from {service}: {message}")]
    Parse { service: Service, message: String },

    #[error("Filesystem error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Template render error for template {name}: {message}")]
    Template { name: String, message: String },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Builds an `HttpStatus` error, keeping only a short preview of the body.
    pub fn http_status(
        service: Service,
        status: reqwest::StatusCode,
        url: impl Into<String>,
        body: &str,
    ) -> Self {
        AppError::HttpStatus {
            service,
            status,
            url: url.into(),
            body: preview(body),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Whether a retry has a chance of succeeding.
    ///
    /// Only transport failures and non-2xx responses qualify; everything else
    /// fails identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::HttpStatus { .. })
    }

    /// The HTTP status, when the failure was a non-success response.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            AppError::HttpStatus { status, .. } => Some(*status),
            AppError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(err: handlebars::RenderError) -> Self {
        AppError::Template {
            name: err.template_name.clone().unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

/// Truncates an error body to a printable preview.
fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = trimmed.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_body_is_truncated() {
        let body = "x".repeat(ERROR_BODY_PREVIEW_LENGTH + 50);
        let err = AppError::http_status(
            Service::Notion,
            reqwest::StatusCode::BAD_GATEWAY,
            "https://api.notion.com/v1/pages",
            &body,
        );
        match err {
            AppError::HttpStatus { body, .. } => {
                assert_eq!(body.len(), ERROR_BODY_PREVIEW_LENGTH + 3);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_network_failures_are_retryable() {
        let status = AppError::http_status(
            Service::Anthropic,
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "u",
            "",
        );
        assert!(status.is_retryable());
        assert_eq!(status.status(), Some(reqwest::StatusCode::TOO_MANY_REQUESTS));

        let parse = AppError::Parse {
            service: Service::Anthropic,
            message: "eof".into(),
        };
        assert!(!parse.is_retryable());
        assert!(!AppError::MissingConfiguration("x".into()).is_retryable());
    }

    #[test]
    fn display_names_the_service() {
        let err = AppError::http_status(
            Service::GoogleDrive,
            reqwest::StatusCode::NOT_FOUND,
            "https://www.googleapis.com/drive/v3/files/abc",
            "not found",
        );
        assert_eq!(
            err.to_string(),
            "Google Drive API returned HTTP 404 Not Found for https://www.googleapis.com/drive/v3/files/abc: not found"
        );
    }
}
