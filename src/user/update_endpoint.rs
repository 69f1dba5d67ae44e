use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    user::{AdminUser, PasswordHash, get_user_by_username, update_user_password},
};

/// The request body for updating an admin user's password.
#[derive(Debug, Deserialize)]
pub struct PasswordUpdate {
    /// The new raw (unhashed) password.
    pub password: String,
}

/// A route handler that replaces the password of the user named in the path.
///
/// # Errors
///
/// Returns an [Error::NotFound] (404) if the username is not registered.
pub async fn update_user_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Path(username): Path<String>,
    Json(update): Json<PasswordUpdate>,
) -> Result<Json<AdminUser>, Error> {
    let password_hash = PasswordHash::new(&update.password, PasswordHash::DEFAULT_COST)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLock
    })?;

    // The store's update is a no-op on an unknown username, so check
    // existence here to report 404.
    get_user_by_username(&username, &connection)?;
    update_user_password(&username, password_hash, &connection)?;

    let user = get_user_by_username(&username, &connection)?;

    Ok(Json(user))
}
