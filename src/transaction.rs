//! Sale transaction records.
//!
//! This module contains everything related to transaction records:
//! - The `Transaction` model and its database queries
//! - CSV bulk import (with text encoding detection) and CSV export
//! - The typed query filter and its SQL queries
//! - Route handlers for the transaction endpoints

mod core;
mod delete_endpoint;
mod export;
mod filter;
mod filter_endpoint;
mod import;
mod import_endpoint;
mod list_endpoint;
mod update_endpoint;

pub use self::core::{
    Transaction, TransactionUpdate, WIRE_DATETIME_FORMAT, all_transactions, count_transactions,
    create_transaction_table, delete_transaction, get_transaction, import_transactions,
    map_transaction_row, update_transaction,
};
pub use delete_endpoint::delete_transaction_endpoint;
pub use export::export_filter_results;
pub use filter::{FilterParams, TransactionFilter, filter_transactions};
pub use filter_endpoint::filter_transactions_endpoint;
pub use import::parse_transactions_csv;
pub use import_endpoint::{ImportSummary, import_transactions_endpoint};
pub use list_endpoint::{Pagination, list_transactions_endpoint};
pub use update_endpoint::update_transaction_endpoint;
