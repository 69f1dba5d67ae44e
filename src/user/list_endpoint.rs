use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{AppState, Error, auth::AuthenticatedUser, user::{AdminUser, list_users}};

/// Controls which window of the user listing is returned.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    /// How many users to skip from the start of the listing.
    #[serde(default)]
    pub skip: u64,
    /// The maximum number of users to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// A route handler that lists admin users ordered by ID.
pub async fn list_users_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Query(params): Query<UserListParams>,
) -> Result<Json<Vec<AdminUser>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLock
    })?;

    let users = list_users(params.skip, params.limit, &connection)?;

    Ok(Json(users))
}
