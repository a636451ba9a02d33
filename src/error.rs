// src/error.rs
// =============================================================================
// The error taxonomy of the audit pipeline.
//
// Every way an audit can stop early is one variant here. The HTTP layer turns
// a variant into a status code with `status_code()`, and the Display text is
// what the caller sees in the `error` field, so it never carries internal
// detail. Fetch failures keep their cause separately for logging.
// =============================================================================

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// The request carried no URL (or only whitespace)
    #[error("URL is required")]
    MissingUrl,

    /// The URL could not be parsed, or has no host
    #[error("Invalid URL format")]
    InvalidUrl,

    /// Anything other than http:// or https://
    #[error("Only HTTP and HTTPS URLs are allowed")]
    DisallowedScheme,

    /// The host is loopback, private or otherwise internal
    #[error("Internal URLs are not allowed")]
    InternalUrlBlocked,

    /// The request body was not the expected JSON object
    #[error("Invalid request body")]
    InvalidBody,

    /// The request gate denied the caller
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The target page could not be fetched. The String is the internal
    /// cause and is only logged.
    #[error("Failed to analyze website")]
    FetchFailed(String),
}

impl AuditError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuditError::MissingUrl
            | AuditError::InvalidUrl
            | AuditError::DisallowedScheme
            | AuditError::InternalUrlBlocked
            | AuditError::InvalidBody => StatusCode::BAD_REQUEST,
            AuditError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuditError::FetchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for errors caused by the caller's input, which never reach the
    /// network layer
    pub fn is_validation(&self) -> bool {
        self.status_code() == StatusCode::BAD_REQUEST
    }
}
