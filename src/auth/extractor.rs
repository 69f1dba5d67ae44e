//! The extractor that guards protected endpoints.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    AppState, Error,
    auth::verify_token,
    user::{AdminUser, get_user_by_username},
};

/// The admin user a request's bearer token resolves to.
///
/// Adding this extractor to a route handler's arguments makes the route
/// require authentication: requests without a valid token are rejected with
/// 401 and a `WWW-Authenticate: Bearer` challenge before the handler runs,
/// and requests from disabled accounts are rejected with 403.
pub struct AuthenticatedUser(pub AdminUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::Unauthorized)?;

        let state = AppState::from_ref(state);
        let username = verify_token(bearer.token(), state.decoding_key())?;

        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLock
        })?;

        // A token can outlive its user, e.g. after the account is deleted.
        let user = get_user_by_username(&username, &connection).map_err(|error| match error {
            Error::NotFound => Error::Unauthorized,
            error => error,
        })?;

        if user.disabled {
            return Err(Error::AccountDisabled);
        }

        Ok(AuthenticatedUser(user))
    }
}
