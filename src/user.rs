//! Admin user management.
//!
//! This module contains the admin user model, its database queries, the
//! password hashing wrapper, and the route handlers for the user endpoints.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod me_endpoint;
mod password;
mod update_endpoint;

pub use core::{
    AdminUser, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, RowsAffected, UserId,
    count_users, create_admin_user_table, create_user, delete_user, get_user_by_id,
    get_user_by_username, list_users, seed_default_admin, update_user_password,
};
pub use create_endpoint::create_user_endpoint;
pub use delete_endpoint::delete_user_endpoint;
pub use get_endpoint::get_user_endpoint;
pub use list_endpoint::list_users_endpoint;
pub use me_endpoint::me_endpoint;
pub use password::PasswordHash;
pub use update_endpoint::update_user_endpoint;
