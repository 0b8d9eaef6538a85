//! Error taxonomy shared by the HTTP adapter, the session and the list
//! controllers.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = BackofficeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BackofficeError {
    /// The request never reached the server or no response came back.
    #[error("{0}")]
    Network(String),

    /// Client-side field checks failed; the request was never sent.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The server answered with a 4xx/5xx status.
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },

    /// 401/403. When the request carried the session's token (outside the
    /// `/auth/` flows) the session has already been torn down.
    #[error("{0}")]
    Unauthorized(String),

    #[error("invalid response from back-office API: {0}")]
    Decode(String),

    #[error("credential store error: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no deletion is pending confirmation")]
    NoPendingDelete,
}

impl BackofficeError {
    /// HTTP status carried by server-side failures, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<keyring::Error> for BackofficeError {
    fn from(err: keyring::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Convert a `reqwest::Error` into a user-friendly message.
pub(crate) fn friendly_error(url: &str, err: &reqwest::Error) -> String {
    if err.is_connect() {
        return format!("Cannot reach back-office API at {url}");
    }
    if err.is_timeout() {
        return format!("Connection to {url} timed out");
    }
    if err.is_builder() {
        return format!("Invalid back-office API URL: {url}");
    }
    format!("Network error communicating with {url}: {err}")
}

/// Convert an HTTP status code into a user-friendly message. The status
/// itself is appended by the error's `Display`.
pub(crate) fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "Request was rejected by the server".to_string(),
        401 => "Session is invalid or expired".to_string(),
        403 => "Not authorized for this operation".to_string(),
        404 => "Resource not found".to_string(),
        409 => "Conflicting change rejected by the server".to_string(),
        s if s >= 500 => "Back-office server error".to_string(),
        _ => "Unexpected response from back-office API".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_covers_auth_and_server_ranges() {
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED),
            "Session is invalid or expired"
        );
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY),
            "Back-office server error"
        );
        assert_eq!(
            status_error(StatusCode::IM_A_TEAPOT),
            "Unexpected response from back-office API"
        );
    }

    #[test]
    fn server_error_display_includes_status() {
        let err = BackofficeError::Server {
            status: 409,
            message: "Category slug already exists".into(),
        };
        assert_eq!(err.to_string(), "Category slug already exists (HTTP 409)");
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_validation());
    }
}
