//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxReswap, SwapOption};

use crate::{
    alert::Alert,
    api::ApiError,
    auth::SessionExpired,
    internal_server_error::InternalServerError,
    not_found::NotFoundError,
    transaction::{ControllerError, FilterError},
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A backend call failed for a reason other than an expired session.
    #[error(transparent)]
    Api(ApiError),

    /// The backend rejected the session token.
    ///
    /// The auth middleware turns this into a redirect to the log-in page
    /// after dropping the session.
    #[error("the session has expired")]
    SessionExpired,

    /// The requested transaction or page does not exist.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The filter form could not be parsed.
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),

    /// The transaction form could not be parsed.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// An import was submitted without a file.
    #[error("Select a file first")]
    NoFileSelected,

    /// The multipart form could not be read.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The session could not be written to the cookie jar.
    #[error("could not set the session cookie: {0}")]
    CookieError(String),

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The transactions could not be written as CSV.
    #[error("could not export transactions: {0}")]
    ExportError(String),

    /// A bulk action was requested with no rows selected.
    #[error("no transactions are selected")]
    NothingSelected,
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized(_) => Error::SessionExpired,
            ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND => Error::NotFound,
            error => Error::Api(error),
        }
    }
}

impl From<ControllerError> for Error {
    fn from(error: ControllerError) -> Self {
        match error {
            ControllerError::Api(error) => error.into(),
            ControllerError::NothingSelected => Error::NothingSelected,
        }
    }
}

/// The response for an expired session. The auth middleware replaces it
/// with a redirect to the log-in page.
fn session_expired_response() -> Response {
    let mut response = StatusCode::UNAUTHORIZED.into_response();
    response.extensions_mut().insert(SessionExpired);
    response
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::SessionExpired => session_expired_response(),
            Error::NotFound => NotFoundError.into_response(),
            Error::Api(ApiError::Transport(error)) => {
                tracing::error!("Could not reach the backend: {error}");
                InternalServerError {
                    description: "The cash-book server could not be reached.",
                    fix: "Check that the backend is running and try again.",
                }
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    ///
    /// The response tells htmx not to swap its target, so only the
    /// out-of-band alert is shown.
    pub fn into_alert_response(self) -> Response {
        if self == Error::SessionExpired {
            return session_expired_response();
        }

        let (status_code, alert) = self.into_alert();

        (status_code, HxReswap(SwapOption::None), alert.into_html()).into_response()
    }

    /// Convert the error into an HTTP response with an HTML alert that
    /// replaces the request's target, for forms that show errors in place.
    pub fn into_inline_alert_response(self) -> Response {
        if self == Error::SessionExpired {
            return session_expired_response();
        }

        let (status_code, alert) = self.into_alert();

        (status_code, alert.into_inline_html()).into_response()
    }

    fn into_alert(self) -> (StatusCode, Alert) {
        match self {
            Error::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                Alert::ErrorSimple {
                    message: "Your session has expired. Please log in again.".to_owned(),
                },
            ),
            Error::Api(error) => {
                tracing::error!("Backend request failed: {error}");
                let status_code = match &error {
                    ApiError::Status { status, .. } if status.is_client_error() => {
                        StatusCode::BAD_REQUEST
                    }
                    _ => StatusCode::BAD_GATEWAY,
                };
                (
                    status_code,
                    Alert::Error {
                        message: "Request failed".to_owned(),
                        details: error.user_message(),
                    },
                )
            }
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Transaction not found".to_owned(),
                    details: "Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::InvalidFilter(error) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid filter".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::InvalidTransaction(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction".to_owned(),
                    details,
                },
            ),
            Error::NoFileSelected => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: Error::NoFileSelected.to_string(),
                },
            ),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the uploaded file".to_owned(),
                    details,
                },
            ),
            Error::NothingSelected => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Select at least one transaction first".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        }
    }
}
