//! The login endpoint that exchanges credentials for an access token.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, auth::issue_token, user::get_user_by_username};

/// The username and password sent to the login endpoint.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// The admin user's name.
    pub username: String,
    /// The admin user's raw (unhashed) password.
    pub password: String,
}

/// The response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed access token to present on protected endpoints.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

/// A route handler that verifies `credentials` and issues an access token.
///
/// An unknown username and a wrong password are indistinguishable to the
/// client: both produce the same 401 response.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if the username is not registered
/// or the password does not match.
pub async fn log_in_endpoint(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, Error> {
    let user = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLock
        })?;

        get_user_by_username(&credentials.username, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    let password_is_correct = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| {
            tracing::error!("error verifying password: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let access_token = issue_token(&user.username, state.token_ttl, state.encoding_key())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_owned(),
    }))
}
