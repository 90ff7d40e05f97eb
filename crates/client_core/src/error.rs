//! Failure taxonomy for backend calls.

use thiserror::Error;

/// Raw bodies quoted in diagnostics are cut to this many characters.
const RAW_BODY_PREVIEW_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    ConnectionFailure,
    Http,
    MalformedResponse,
    MissingUsername,
    Unexpected,
}

impl BackendErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            BackendErrorKind::ConnectionFailure => "connection failure",
            BackendErrorKind::Http => "http error",
            BackendErrorKind::MalformedResponse => "malformed response",
            BackendErrorKind::MissingUsername => "missing username",
            BackendErrorKind::Unexpected => "unexpected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("could not connect to the backend server: {0}")]
    ConnectionFailure(String),
    #[error("Backend returned an error: {status} - {message}")]
    Http { status: u16, message: String },
    #[error("Failed to parse server response as JSON. Error: {detail}. Raw Response: '{raw}'")]
    MalformedResponse { detail: String, raw: String },
    #[error("no username available")]
    MissingUsername,
    #[error("{0}")]
    Unexpected(String),
}

impl BackendError {
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            BackendError::ConnectionFailure(_) => BackendErrorKind::ConnectionFailure,
            BackendError::Http { .. } => BackendErrorKind::Http,
            BackendError::MalformedResponse { .. } => BackendErrorKind::MalformedResponse,
            BackendError::MissingUsername => BackendErrorKind::MissingUsername,
            BackendError::Unexpected(_) => BackendErrorKind::Unexpected,
        }
    }

    /// Classifies a transport-level reqwest failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            BackendError::ConnectionFailure(err.to_string())
        } else if err.is_decode() {
            BackendError::MalformedResponse {
                detail: err.to_string(),
                raw: String::new(),
            }
        } else {
            BackendError::Unexpected(err.to_string())
        }
    }

    pub fn malformed(detail: impl ToString, raw: &str) -> Self {
        BackendError::MalformedResponse {
            detail: detail.to_string(),
            raw: preview(raw),
        }
    }

    /// True for 4xx responses, i.e. the backend rejected what we sent.
    pub fn is_client_rejection(&self) -> bool {
        matches!(self, BackendError::Http { status, .. } if (400..500).contains(status))
    }
}

fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= RAW_BODY_PREVIEW_LEN {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(RAW_BODY_PREVIEW_LEN).collect();
    cut.push_str("...");
    cut
}
