//! Defines the app level error type and its mapping to JSON error responses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of username and password.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// The bearer token is missing, malformed, expired or has a bad signature.
    ///
    /// The response for this error must carry a `WWW-Authenticate: Bearer`
    /// challenge header so that clients know how to authenticate.
    #[error("could not validate credentials")]
    Unauthorized,

    /// The token resolved to a user whose account has been disabled.
    #[error("the user account is disabled")]
    AccountDisabled,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The username used to create an admin user is already registered.
    #[error("the username \"{0}\" is already registered")]
    DuplicateUsername(String),

    /// A CSV import contained a transaction ID that already exists in the
    /// database. The whole batch is rejected, no rows are kept.
    #[error("transaction {0} already exists in the database")]
    DuplicateTransactionId(Uuid),

    /// The filter endpoint was called with a parameter that does not name a
    /// supported filter dimension.
    #[error("unknown filter parameter \"{0}\"")]
    UnknownFilterParameter(String),

    /// A request argument (range bound, page number, etc.) failed validation.
    #[error("{0}")]
    Validation(String),

    /// The requested page does not exist for the current record set.
    #[error("page {page} is out of range for {page_count} pages")]
    PageOutOfRange {
        /// The 1-indexed page that was requested.
        page: u64,
        /// How many pages the record set splits into.
        page_count: u64,
    },

    /// The CSV had issues that prevented it from being parsed.
    #[error("could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// The multipart form could not be read as an uploaded CSV file.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file was not a CSV.
    #[error("file is not a CSV")]
    NotCsv,

    /// The filter results could not be written to the export CSV file.
    #[error("could not write the export CSV: {0}")]
    ExportFailed(String),

    /// Signing an access token failed.
    #[error("could not create an access token: {0}")]
    TokenCreation(String),

    /// An unexpected error occurred in the password hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// clients get a generic internal error message.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {error}");
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Error::InvalidCredentials | Error::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::AccountDisabled => (StatusCode::FORBIDDEN, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::DuplicateUsername(_) | Error::DuplicateTransactionId(_) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            Error::UnknownFilterParameter(_)
            | Error::InvalidCsv(_)
            | Error::MultipartError(_)
            | Error::NotCsv => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::Validation(_) | Error::PageOutOfRange { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            // Storage and crypto errors are not intended to be shown to the
            // client, report a generic message and keep the detail in the logs.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{
        http::{StatusCode, header},
        response::IntoResponse,
    };

    use super::Error;

    #[test]
    fn unauthorized_carries_bearer_challenge() {
        let response = Error::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .expect("401 responses must carry a WWW-Authenticate header"),
            "Bearer"
        );
    }

    #[test]
    fn invalid_credentials_carries_bearer_challenge() {
        let response = Error::InvalidCredentials.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[test]
    fn sql_errors_do_not_leak_detail() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn conflict_maps_to_409() {
        let response = Error::DuplicateUsername("admin".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
