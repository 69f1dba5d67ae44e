//! Defines the transaction record model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};
use uuid::Uuid;

use crate::{Error, user::RowsAffected};

/// The datetime format used on the wire: in CSV files, JSON bodies, and the
/// range bounds of date filters, e.g. "20201224 193000".
pub const WIRE_DATETIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year][month][day] [hour][minute][second]");

pub(crate) mod wire_datetime {
    //! Serializes a [time::PrimitiveDateTime] in the wire format shared with
    //! the CSV import and export formats.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    use super::WIRE_DATETIME_FORMAT;

    pub fn serialize<S>(dt: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(WIRE_DATETIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PrimitiveDateTime::parse(&s, WIRE_DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One row representing a sold item delivery.
///
/// The ID is unique and immutable after creation, every other field can be
/// rewritten by an update. The store does not enforce that `total_price`
/// equals `quantity * unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The unique ID of the transaction.
    pub transaction_id: Uuid,
    /// When the transaction happened.
    #[serde(with = "wire_datetime")]
    pub transaction_time: PrimitiveDateTime,
    /// The name of the sold product.
    pub product_name: String,
    /// How many units were sold.
    pub quantity: i64,
    /// The price of a single unit.
    pub unit_price: f64,
    /// The total price as recorded in the source data.
    pub total_price: f64,
    /// The city the items were delivered to.
    pub delivered_to_city: String,
}

/// The mutable fields of a [Transaction], used by the update endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionUpdate {
    /// When the transaction happened.
    #[serde(with = "wire_datetime")]
    pub transaction_time: PrimitiveDateTime,
    /// The name of the sold product.
    pub product_name: String,
    /// How many units were sold.
    pub quantity: i64,
    /// The price of a single unit.
    pub unit_price: f64,
    /// The total price.
    pub total_price: f64,
    /// The city the items were delivered to.
    pub delivered_to_city: String,
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                transaction_id TEXT PRIMARY KEY,
                transaction_time TEXT NOT NULL,
                product_name TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                unit_price REAL NOT NULL,
                total_price REAL NOT NULL,
                delivered_to_city TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a stored transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: Uuid, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT transaction_id, transaction_time, product_name, quantity, unit_price, \
             total_price, delivered_to_city FROM \"transaction\" WHERE transaction_id = :id",
        )?
        .query_one(&[(":id", &id.to_string())], map_transaction_row)
        .map_err(|error| error.into())
}

/// Get every transaction in the database, in insertion order.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT transaction_id, transaction_time, product_name, quantity, unit_price, \
             total_price, delivered_to_city FROM \"transaction\" ORDER BY rowid ASC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

/// Replace every mutable field of the transaction with ID `id`.
///
/// Updating an ID that does not exist is a no-op that reports zero rows
/// affected, callers that want a not-found error must check existence first.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn update_transaction(
    id: Uuid,
    fields: &TransactionUpdate,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\" SET transaction_time = ?1, product_name = ?2, \
             quantity = ?3, unit_price = ?4, total_price = ?5, delivered_to_city = ?6 \
             WHERE transaction_id = ?7",
            (
                fields.transaction_time,
                &fields.product_name,
                fields.quantity,
                fields.unit_price,
                fields.total_price,
                &fields.delivered_to_city,
                id.to_string(),
            ),
        )
        .map_err(|error| error.into())
}

/// Delete the transaction with ID `id`.
///
/// Reports zero rows affected when the ID does not exist.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn delete_transaction(id: Uuid, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE transaction_id = :id",
            &[(":id", &id.to_string())],
        )
        .map_err(|error| error.into())
}

/// Insert `records` into the database inside a single SQL transaction.
///
/// The import is all-or-nothing: if any record's ID collides with a stored
/// transaction (or another record in the batch), the whole batch is rolled
/// back and nothing is kept.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateTransactionId] if a record's ID already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn import_transactions(
    records: &[Transaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    {
        let mut statement = tx.prepare(
            "INSERT INTO \"transaction\" (transaction_id, transaction_time, product_name, \
             quantity, unit_price, total_price, delivered_to_city) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for record in records {
            statement
                .execute((
                    record.transaction_id.to_string(),
                    record.transaction_time,
                    &record.product_name,
                    record.quantity,
                    record.unit_price,
                    record.total_price,
                    &record.delivered_to_city,
                ))
                .map_err(|error| match error {
                    rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error {
                            code: _,
                            extended_code:
                                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                                | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                        },
                        _,
                    ) => Error::DuplicateTransactionId(record.transaction_id),
                    error => error.into(),
                })?;
        }
    }

    // An early return above drops `tx` unchanged, which rolls it back.
    tx.commit()?;

    Ok(records.len())
}

/// Get the number of transactions in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(transaction_id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_id: String = row.get(0)?;
    let transaction_id = Uuid::parse_str(&raw_id).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })?;

    Ok(Transaction {
        transaction_id,
        transaction_time: row.get(1)?,
        product_name: row.get(2)?,
        quantity: row.get(3)?,
        unit_price: row.get(4)?,
        total_price: row.get(5)?,
        delivered_to_city: row.get(6)?,
    })
}
