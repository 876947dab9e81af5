//! Errors raised while talking to the cash-book backend.

use reqwest::StatusCode;

/// Why a backend operation failed.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiError {
    /// The request never completed, e.g. the backend is down or timed out.
    #[error("could not reach the backend: {0}")]
    Transport(String),

    /// The backend rejected the credentials or the session token.
    ///
    /// Callers should treat this as "log in again" rather than as an
    /// ordinary failure.
    #[error("the backend rejected the session: {0}")]
    Unauthorized(String),

    /// The backend answered with a non-success status.
    #[error("the backend responded with {status}: {message}")]
    Status {
        /// The HTTP status the backend returned.
        status: StatusCode,
        /// The backend's explanation, or the status reason if it gave none.
        message: String,
    },

    /// The response body was not in the expected shape.
    #[error("could not decode the backend response: {0}")]
    Decode(String),

    /// A check on the client side failed before any request was sent.
    #[error("{0}")]
    Precondition(String),
}

impl ApiError {
    /// Whether the user must log in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// A short message that is safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_owned()
            }
            ApiError::Unauthorized(_) => "Your session has expired. Please log in again.".to_owned(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_owned(),
            ApiError::Precondition(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}
