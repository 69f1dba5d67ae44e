//! Bearer-token authentication for the REST API.
//!
//! Admin users exchange their credentials for a signed, time-limited access
//! token at the login endpoint. Every other endpoint requires the token in an
//! `Authorization: Bearer` header, which the [AuthenticatedUser] extractor
//! resolves back to a non-disabled admin user.

mod extractor;
mod log_in;
mod token;

pub use extractor::AuthenticatedUser;
pub use log_in::{Credentials, TokenResponse, log_in_endpoint};
pub use token::{issue_token, verify_token};
