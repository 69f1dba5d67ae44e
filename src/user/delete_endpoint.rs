use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    user::{delete_user, get_user_by_username},
};

/// A route handler that deletes the admin user named in the path.
///
/// # Errors
///
/// Returns an [Error::NotFound] (404) if the username is not registered.
pub async fn delete_user_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Path(username): Path<String>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLock
    })?;

    // The store reports zero rows affected for an unknown username instead of
    // an error, so check existence here to report 404.
    get_user_by_username(&username, &connection)?;
    delete_user(&username, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod delete_user_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{
        Error, build_router,
        test_utils::{sign_in_as_admin, test_state_with_admin},
        user::{PasswordHash, create_user, get_user_by_username},
    };

    #[tokio::test]
    async fn deletes_the_user() {
        let state = test_state_with_admin();
        {
            let connection = state.db_connection.lock().unwrap();
            create_user("alice", PasswordHash::new_unchecked("hunter2"), &connection).unwrap();
        }
        let server = TestServer::new(build_router(state.clone())).unwrap();
        let token = sign_in_as_admin(&server).await;

        server
            .delete("/api/users/alice")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_user_by_username("alice", &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let state = test_state_with_admin();
        let server = TestServer::new(build_router(state)).unwrap();
        let token = sign_in_as_admin(&server).await;

        server
            .delete("/api/users/nobody")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_missing_token() {
        let state = test_state_with_admin();
        let server = TestServer::new(build_router(state)).unwrap();

        server
            .delete("/api/users/admin")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
