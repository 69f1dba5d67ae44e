use axum::Json;

use crate::{auth::AuthenticatedUser, user::AdminUser};

/// A route handler that returns the admin user the request's token resolves
/// to.
pub async fn me_endpoint(AuthenticatedUser(user): AuthenticatedUser) -> Json<AdminUser> {
    Json(user)
}

#[cfg(test)]
mod me_endpoint_tests {
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::{
        build_router, endpoints,
        test_utils::{sign_in_as_admin, test_state_with_admin},
    };

    #[tokio::test]
    async fn returns_the_token_holder() {
        let state = test_state_with_admin();
        let server = TestServer::new(build_router(state)).unwrap();
        let token = sign_in_as_admin(&server).await;

        let response = server.get(endpoints::ME).authorization_bearer(&token).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["username"], "admin");
        assert_eq!(body["disabled"], false);
        assert!(
            body.get("password_hash").is_none(),
            "the password hash must not appear in API responses: {body}"
        );
    }
}
