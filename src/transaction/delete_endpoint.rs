use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    transaction::{delete_transaction, get_transaction},
};

/// A route handler that deletes a transaction by its ID.
///
/// # Errors
///
/// Returns an [Error::NotFound] (404) if the ID does not refer to a stored
/// transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLock
    })?;

    // The store reports zero rows affected for an unknown ID instead of an
    // error, so check existence here to report 404.
    get_transaction(transaction_id, &connection)?;
    delete_transaction(transaction_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
