//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::log_in_endpoint,
    endpoints, logging_middleware,
    transaction::{
        delete_transaction_endpoint, filter_transactions_endpoint, import_transactions_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
    user::{
        create_user_endpoint, delete_user_endpoint, get_user_endpoint, list_users_endpoint,
        me_endpoint, update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// The login route is the only one that does not require a bearer token:
/// every other handler takes an [crate::auth::AuthenticatedUser] argument,
/// which rejects unauthenticated requests before the handler runs.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ACCESS_TOKEN, post(log_in_endpoint))
        .route(endpoints::ME, get(me_endpoint))
        .route(
            endpoints::USERS,
            post(create_user_endpoint).get(list_users_endpoint),
        )
        .route(
            endpoints::USER,
            get(get_user_endpoint)
                .put(update_user_endpoint)
                .delete(delete_user_endpoint),
        )
        .route(endpoints::IMPORT, post(import_transactions_endpoint))
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::FILTER, get(filter_transactions_endpoint))
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
