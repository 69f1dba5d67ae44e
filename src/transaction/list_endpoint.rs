use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    pagination::paginate,
    transaction::{Transaction, all_transactions},
};

/// Controls which page of the transaction listing is returned.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    /// The page number to display. Starts from 1.
    #[serde(default = "default_page")]
    pub page: u64,
    /// The maximum number of transactions to display per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

/// A route handler for the paginated transaction listing.
///
/// # Errors
///
/// Returns an [Error::PageOutOfRange] (422) if the requested page does not
/// exist for the current record set, including when the set is empty.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let records = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLock
        })?;

        all_transactions(&connection)?
    };

    let page = paginate(pagination.page, pagination.page_size, records)?;

    Ok(Json(page))
}
