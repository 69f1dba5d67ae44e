use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    transaction::{Transaction, TransactionUpdate, get_transaction, update_transaction},
};

/// A route handler that rewrites every mutable field of a transaction.
///
/// # Errors
///
/// Returns an [Error::NotFound] (404) if the ID does not refer to a stored
/// transaction.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Path(transaction_id): Path<Uuid>,
    Json(fields): Json<TransactionUpdate>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLock
    })?;

    // The store's update is a no-op on an unknown ID, so check existence
    // here to report 404.
    get_transaction(transaction_id, &connection)?;
    update_transaction(transaction_id, &fields, &connection)?;

    let updated = get_transaction(transaction_id, &connection)?;

    Ok(Json(updated))
}
