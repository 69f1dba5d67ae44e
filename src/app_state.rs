//! Implements a struct that holds the state of the REST server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;
use time::Duration;

/// The keys used to sign and verify access tokens.
///
/// Both keys are derived from the same secret, they are kept together so that
/// they cannot drift apart.
#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// The state of the REST server.
///
/// The configuration it carries is validated by the server binary before the
/// state is constructed, so the fields here are always usable as-is.
#[derive(Clone)]
pub struct AppState {
    /// The database connection shared between request handlers.
    pub db_connection: Arc<Mutex<Connection>>,

    /// How long issued access tokens stay valid.
    pub token_ttl: Duration,

    /// Where the filter endpoint writes CSV exports.
    pub export_path: PathBuf,

    jwt_keys: JwtKeys,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// `token_secret` is the secret used to sign and verify access tokens,
    /// it must not be empty (the server binary refuses to start without one).
    pub fn new(
        db_connection: Arc<Mutex<Connection>>,
        token_secret: &str,
        token_ttl: Duration,
        export_path: PathBuf,
    ) -> Self {
        Self {
            db_connection,
            token_ttl,
            export_path,
            jwt_keys: JwtKeys {
                encoding_key: EncodingKey::from_secret(token_secret.as_ref()),
                decoding_key: DecodingKey::from_secret(token_secret.as_ref()),
            },
        }
    }

    /// The encoding key for signing access tokens.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding_key
    }

    /// The decoding key for verifying access tokens.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding_key
    }
}
