//! Schema creation for the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, transaction::create_transaction_table, user::create_admin_user_table,
};

/// Create the application's tables if they do not exist yet.
///
/// This is an explicit migration step: callers (the server binary, tests)
/// run it once against a freshly opened connection before using the stores.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_admin_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
