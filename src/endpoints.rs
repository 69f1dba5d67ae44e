//! The API endpoint URIs.

/// The route for exchanging credentials for an access token.
pub const ACCESS_TOKEN: &str = "/api/access_token";
/// The route for introspecting the currently authenticated user.
pub const ME: &str = "/api/users/me";
/// The route to create or list admin users.
pub const USERS: &str = "/api/users";
/// The route to access a single admin user.
///
/// GET interprets the parameter as the integer user ID, PUT and DELETE
/// interpret it as the username.
pub const USER: &str = "/api/users/{user_id}";
/// The route for the paginated transaction listing.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to upload a CSV file of transactions.
pub const IMPORT: &str = "/api/transactions/import";
/// The route for filtered transaction queries.
pub const FILTER: &str = "/api/transactions/filter";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
