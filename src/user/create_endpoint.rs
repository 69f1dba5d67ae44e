use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState, Error,
    auth::{AuthenticatedUser, Credentials},
    user::{AdminUser, PasswordHash, create_user},
};

/// A route handler for registering a new admin user.
///
/// # Errors
/// Returns an [Error::DuplicateUsername] (409) if the username is already
/// registered.
pub async fn create_user_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<AdminUser>), Error> {
    let password_hash = PasswordHash::new(&credentials.password, PasswordHash::DEFAULT_COST)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLock
    })?;

    let user = create_user(&credentials.username, password_hash, &connection)?;

    Ok((StatusCode::CREATED, Json(user)))
}
