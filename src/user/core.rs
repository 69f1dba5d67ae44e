//! Defines the admin user model and its database queries.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, user::PasswordHash};

/// A newtype-free alias for integer admin user IDs.
pub type UserId = i64;

/// The username of the admin user that is seeded when the table is empty.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// The raw password of the seeded admin user.
///
/// Operators are expected to change this through the user update endpoint
/// after the first deployment.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// A credentialed operator permitted to call protected endpoints.
///
/// The password hash is never serialized into API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminUser {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's unique name, used to log in and as the token subject.
    pub username: String,
    /// The user's password hash.
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
    /// Whether the account has been disabled by an operator.
    ///
    /// Disabled accounts can still obtain tokens but every protected request
    /// made with them is rejected.
    pub disabled: bool,
}

/// Create the admin user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_admin_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS admin_user (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                disabled INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new admin user into the database.
///
/// # Errors
///
/// Returns an [Error::DuplicateUsername] if `username` is already registered,
/// or an [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<AdminUser, Error> {
    connection
        .execute(
            "INSERT INTO admin_user (username, password) VALUES (?1, ?2)",
            (username, password_hash.as_ref()),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateUsername(username.to_owned()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(AdminUser {
        id,
        username: username.to_owned(),
        password_hash,
        disabled: false,
    })
}

/// Get the admin user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an [Error::NotFound] if `user_id` does not
/// belong to a registered user, or an [Error::SqlError] if there was an
/// error trying to access the store.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<AdminUser, Error> {
    connection
        .prepare("SELECT id, username, password, disabled FROM admin_user WHERE id = :id")?
        .query_one(&[(":id", &user_id)], map_admin_user_row)
        .map_err(|error| error.into())
}

/// Get the admin user from the database with the specified `username`.
///
/// # Errors
///
/// This function will return an [Error::NotFound] if no user with the given
/// username exists, or an [Error::SqlError] if there was an error trying to
/// access the store.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<AdminUser, Error> {
    connection
        .prepare(
            "SELECT id, username, password, disabled FROM admin_user WHERE username = :username",
        )?
        .query_one(&[(":username", &username)], map_admin_user_row)
        .map_err(|error| error.into())
}

/// List admin users ordered by ID, skipping the first `skip` rows and
/// returning at most `limit` rows.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn list_users(skip: u64, limit: u64, connection: &Connection) -> Result<Vec<AdminUser>, Error> {
    connection
        .prepare(
            "SELECT id, username, password, disabled FROM admin_user \
             ORDER BY id ASC LIMIT :limit OFFSET :skip",
        )?
        .query_map(
            &[(":limit", &(limit as i64)), (":skip", &(skip as i64))],
            map_admin_user_row,
        )?
        .map(|maybe_user| maybe_user.map_err(Error::SqlError))
        .collect()
}

/// How many rows an UPDATE or DELETE statement touched.
pub type RowsAffected = usize;

/// Replace the password hash of the user with the specified `username`.
///
/// Updating a username that does not exist is a no-op that reports zero rows
/// affected, callers that want a not-found error must check existence first.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn update_user_password(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE admin_user SET password = ?1 WHERE username = ?2",
            (password_hash.as_ref(), username),
        )
        .map_err(|error| error.into())
}

/// Delete the user with the specified `username`.
///
/// Reports zero rows affected when the username does not exist.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn delete_user(username: &str, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM admin_user WHERE username = :username",
            &[(":username", &username)],
        )
        .map_err(|error| error.into())
}

/// Get the number of admin users in the database.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM admin_user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Insert the default admin user if no user named "admin" exists yet.
///
/// This is an explicit, idempotent migration step: the server binary runs it
/// once at startup after [crate::initialize_db], library code never calls it
/// implicitly.
///
/// # Errors
///
/// Returns an [Error::HashingError] if the default password could not be
/// hashed, or an [Error::SqlError] if an SQL related error occurred.
pub fn seed_default_admin(connection: &Connection) -> Result<(), Error> {
    match get_user_by_username(DEFAULT_ADMIN_USERNAME, connection) {
        Ok(_) => Ok(()),
        Err(Error::NotFound) => {
            let password_hash =
                PasswordHash::new(DEFAULT_ADMIN_PASSWORD, PasswordHash::DEFAULT_COST)?;
            let user = create_user(DEFAULT_ADMIN_USERNAME, password_hash, connection)?;

            tracing::info!(
                "created the default admin user \"{}\" (id {})",
                user.username,
                user.id
            );

            Ok(())
        }
        Err(error) => Err(error),
    }
}

fn map_admin_user_row(row: &Row) -> Result<AdminUser, rusqlite::Error> {
    let raw_password_hash: String = row.get(2)?;

    Ok(AdminUser {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        disabled: row.get(3)?,
    })
}

#[cfg(test)]
mod admin_user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        user::{
            DEFAULT_ADMIN_USERNAME, PasswordHash, count_users, create_user, delete_user,
            get_user_by_id, get_user_by_username, list_users, seed_default_admin,
            update_user_password,
        },
    };

    use super::create_admin_user_table;

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_admin_user_table(&conn).expect("Could not create admin user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let conn = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user("alice", password_hash.clone(), &conn).unwrap();

        assert!(inserted_user.id > 0);
        assert_eq!(inserted_user.username, "alice");
        assert_eq!(inserted_user.password_hash, password_hash);
        assert!(!inserted_user.disabled);
    }

    #[test]
    fn insert_user_fails_on_duplicate_username() {
        let conn = get_db_connection();

        create_user("alice", PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        let duplicate = create_user("alice", PasswordHash::new_unchecked("hunter3"), &conn);

        assert_eq!(duplicate, Err(Error::DuplicateUsername("alice".to_owned())));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let conn = get_db_connection();

        assert_eq!(get_user_by_id(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_username() {
        let conn = get_db_connection();
        let test_user = create_user("alice", PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        let retrieved_user = get_user_by_username("alice", &conn).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn list_users_applies_skip_and_limit() {
        let conn = get_db_connection();
        for name in ["alice", "bob", "carol", "dave"] {
            create_user(name, PasswordHash::new_unchecked("hunter2"), &conn).unwrap();
        }

        let users = list_users(1, 2, &conn).unwrap();

        let usernames: Vec<&str> = users.iter().map(|user| user.username.as_str()).collect();
        assert_eq!(usernames, ["bob", "carol"]);
    }

    #[test]
    fn update_password_reports_rows_affected() {
        let conn = get_db_connection();
        create_user("alice", PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        let new_hash = PasswordHash::new("hunter3", 4).unwrap();
        let rows_affected = update_user_password("alice", new_hash, &conn).unwrap();
        assert_eq!(rows_affected, 1);

        let updated = get_user_by_username("alice", &conn).unwrap();
        assert!(updated.password_hash.verify("hunter3").unwrap());
    }

    #[test]
    fn update_password_of_unknown_user_affects_no_rows() {
        let conn = get_db_connection();

        let rows_affected =
            update_user_password("nobody", PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        assert_eq!(rows_affected, 0);
    }

    #[test]
    fn delete_user_reports_rows_affected() {
        let conn = get_db_connection();
        create_user("alice", PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        assert_eq!(delete_user("alice", &conn).unwrap(), 1);
        assert_eq!(delete_user("alice", &conn).unwrap(), 0);
        assert_eq!(get_user_by_username("alice", &conn), Err(Error::NotFound));
    }

    #[test]
    fn seed_default_admin_is_idempotent() {
        let conn = get_db_connection();

        seed_default_admin(&conn).expect("Could not seed the default admin user");
        seed_default_admin(&conn).expect("Seeding twice should not fail");

        assert_eq!(count_users(&conn).unwrap(), 1);

        let admin = get_user_by_username(DEFAULT_ADMIN_USERNAME, &conn).unwrap();
        assert!(admin.password_hash.verify("admin").unwrap());
        assert!(!admin.disabled);
    }
}
