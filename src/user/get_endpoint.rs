use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    user::{AdminUser, UserId, get_user_by_id},
};

/// A route handler that looks up a single admin user by their integer ID.
///
/// # Errors
///
/// Returns an [Error::NotFound] (404) if no user has the given ID.
pub async fn get_user_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<AdminUser>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLock
    })?;

    let user = get_user_by_id(user_id, &connection)?;

    Ok(Json(user))
}
