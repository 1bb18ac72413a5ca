//! Error types for the recipe API client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::client::types::ErrorBody;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Failure of a single API call.
///
/// The variants follow where the call broke down: before a request existed
/// (`Setup`), before a response arrived (`Transport`), in a non-2xx response
/// (`Server`), or while decoding a 2xx body (`Decode`).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request could not be built: {0}")]
    Setup(String),

    #[error("no response from recipe API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("recipe API returned status {status}: {body}")]
    Server { status: StatusCode, body: String },

    #[error("invalid response from recipe API: {0}")]
    Decode(String),
}

impl ApiError {
    /// The `error` field of a JSON error body, if the backend sent one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::Server { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .map(|b| b.error),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        if let Some(message) = self.server_message() {
            return message;
        }
        match self {
            ApiError::Server { status, .. } => format!("Server error: {}", status.as_u16()),
            ApiError::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Setup(_) | ApiError::Decode(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(status: u16, body: &str) -> ApiError {
        ApiError::Server {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn prefers_server_error_field() {
        let err = server(400, r#"{"error":"Title already exists"}"#);
        assert_eq!(err.user_message(), "Title already exists");
    }

    #[test]
    fn falls_back_to_status_code() {
        assert_eq!(server(500, "<html>boom</html>").user_message(), "Server error: 500");
        assert_eq!(server(422, r#"{"detail":"nope"}"#).user_message(), "Server error: 422");
    }

    #[test]
    fn setup_and_decode_are_unexpected() {
        assert_eq!(ApiError::Setup("bad url".into()).user_message(), UNEXPECTED_ERROR_MESSAGE);
        assert_eq!(ApiError::Decode("eof".into()).user_message(), UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn detects_not_found() {
        assert!(server(404, "").is_not_found());
        assert!(!server(500, "").is_not_found());
        assert!(!ApiError::Setup(String::new()).is_not_found());
    }
}
