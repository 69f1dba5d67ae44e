//! Issuing and verifying the signed access tokens.

// Code in this module is adapted from https://github.com/ezesundayeze/axum--auth
// and https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::Error;

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The expiry time of the token as a unix timestamp.
    exp: usize,
    /// The time the token was issued as a unix timestamp.
    iat: usize,
    /// The username the token was issued to.
    sub: String,
}

/// Create a signed access token for `subject` that expires `ttl` from now.
///
/// There is exactly one token lifetime policy: every call site takes the TTL
/// from the application configuration.
///
/// # Errors
///
/// Returns an [Error::TokenCreation] if the token could not be signed.
pub fn issue_token(
    subject: &str,
    ttl: Duration,
    encoding_key: &EncodingKey,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        exp: (now + ttl).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
        sub: subject.to_owned(),
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify `token` and return the subject (username) it was issued to.
///
/// # Errors
///
/// Returns an [Error::Unauthorized] if the signature does not match, the
/// payload is malformed, or the token has expired. The caller does not learn
/// which of these happened, and neither does the client.
pub fn verify_token(token: &str, decoding_key: &DecodingKey) -> Result<String, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims.sub)
        .map_err(|_| Error::Unauthorized)
}
