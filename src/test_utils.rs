//! Helpers shared by the endpoint tests.

use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;
use time::Duration;
use uuid::Uuid;

use crate::{
    AppState,
    auth::TokenResponse,
    db::initialize,
    endpoints,
    user::{PasswordHash, create_user},
};

/// An [AppState] over a fresh in-memory database with no users.
///
/// The export path points at a unique file under the system temp directory
/// so that concurrently running tests do not clobber each other.
pub fn test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize the database");

    let export_path =
        std::env::temp_dir().join(format!("filter_results-{}.csv", Uuid::new_v4()));

    AppState::new(
        Arc::new(Mutex::new(connection)),
        "test-secret",
        Duration::minutes(30),
        export_path,
    )
}

/// A [test_state] with an "admin"/"admin" user.
///
/// The password is hashed with the cheapest bcrypt cost to keep the test
/// suite fast.
pub fn test_state_with_admin() -> AppState {
    let state = test_state();

    {
        let connection = state.db_connection.lock().unwrap();
        let password_hash = PasswordHash::new("admin", 4).expect("Could not hash test password");
        create_user("admin", password_hash, &connection).expect("Could not create admin user");
    }

    state
}

/// Log in as the default admin user and return the access token.
pub async fn sign_in_as_admin(server: &TestServer) -> String {
    let response = server
        .post(endpoints::ACCESS_TOKEN)
        .json(&json!({
            "username": "admin",
            "password": "admin",
        }))
        .await;

    response.assert_status_ok();

    response.json::<TokenResponse>().access_token
}
