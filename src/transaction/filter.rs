//! The typed query filter for transaction records.

use rusqlite::Connection;
use serde::Deserialize;
use time::PrimitiveDateTime;

use crate::{
    Error,
    transaction::{Transaction, WIRE_DATETIME_FORMAT, map_transaction_row},
};

/// The raw query parameters of the filter endpoint.
#[derive(Debug, Deserialize)]
pub struct FilterParams {
    /// Which dimension to filter by: "city", "date", "total_price" or
    /// "quantity".
    pub filter_parameter: String,
    /// The city to match. Required when `filter_parameter` is "city".
    pub city_name: Option<String>,
    /// The inclusive lower range bound. Required for the range filters.
    pub range_start: Option<String>,
    /// The inclusive upper range bound. Required for the range filters.
    pub range_end: Option<String>,
    /// Whether to additionally write the results to the export CSV file.
    #[serde(default)]
    pub save_as_csv: bool,
}

/// One of the supported filter dimensions, with its arguments already
/// validated and parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionFilter {
    /// Case-insensitive exact match on the delivery city.
    City {
        /// The city name to match.
        name: String,
    },
    /// Transactions whose timestamp lies in the inclusive range.
    Date {
        /// The earliest matching timestamp.
        start: PrimitiveDateTime,
        /// The latest matching timestamp.
        end: PrimitiveDateTime,
    },
    /// Transactions whose total price lies in the inclusive range.
    TotalPrice {
        /// The smallest matching total price.
        min: f64,
        /// The largest matching total price.
        max: f64,
    },
    /// Transactions whose quantity lies in the inclusive range.
    Quantity {
        /// The smallest matching quantity.
        min: i64,
        /// The largest matching quantity.
        max: i64,
    },
}

impl TransactionFilter {
    /// Validate `params` into a typed filter.
    ///
    /// # Errors
    ///
    /// Returns an [Error::UnknownFilterParameter] if `filter_parameter` does
    /// not name a supported dimension, and an [Error::Validation] if the
    /// arguments the dimension needs are missing or malformed.
    pub fn from_params(params: &FilterParams) -> Result<Self, Error> {
        match params.filter_parameter.as_str() {
            "city" => {
                let name = params.city_name.as_deref().ok_or_else(|| {
                    Error::Validation("filter by city requires city_name".to_owned())
                })?;

                Ok(TransactionFilter::City {
                    name: name.to_owned(),
                })
            }
            "date" => {
                let (raw_start, raw_end) = require_range(params, "date")?;

                let start = parse_range_datetime(raw_start)?;
                let end = parse_range_datetime(raw_end)?;

                Ok(TransactionFilter::Date { start, end })
            }
            "total_price" => {
                let (raw_start, raw_end) = require_range(params, "total_price")?;

                let min = parse_range_number::<f64>(raw_start)?;
                let max = parse_range_number::<f64>(raw_end)?;

                Ok(TransactionFilter::TotalPrice { min, max })
            }
            "quantity" => {
                let (raw_start, raw_end) = require_range(params, "quantity")?;

                let min = parse_range_number::<i64>(raw_start)?;
                let max = parse_range_number::<i64>(raw_end)?;

                Ok(TransactionFilter::Quantity { min, max })
            }
            other => Err(Error::UnknownFilterParameter(other.to_owned())),
        }
    }
}

fn require_range<'a>(params: &'a FilterParams, name: &str) -> Result<(&'a str, &'a str), Error> {
    match (params.range_start.as_deref(), params.range_end.as_deref()) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(Error::Validation(format!(
            "filter by {name} requires range_start and range_end"
        ))),
    }
}

fn parse_range_datetime(raw: &str) -> Result<PrimitiveDateTime, Error> {
    PrimitiveDateTime::parse(raw, WIRE_DATETIME_FORMAT).map_err(|error| {
        Error::Validation(format!(
            "invalid date range bound \"{raw}\" (expected YYYYMMDD HHMMSS): {error}"
        ))
    })
}

fn parse_range_number<T>(raw: &str) -> Result<T, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|error| Error::Validation(format!("invalid range bound \"{raw}\": {error}")))
}

/// Query for the transactions matching `filter`, in insertion order.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn filter_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    const COLUMNS: &str = "transaction_id, transaction_time, product_name, quantity, \
                           unit_price, total_price, delivered_to_city";

    let rows = match filter {
        TransactionFilter::City { name } => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" \
                 WHERE LOWER(delivered_to_city) = LOWER(:city) ORDER BY rowid ASC"
            ))?
            .query_map(&[(":city", name)], map_transaction_row)?
            .collect::<Result<Vec<_>, _>>(),
        TransactionFilter::Date { start, end } => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" \
                 WHERE transaction_time BETWEEN :start AND :end ORDER BY rowid ASC"
            ))?
            .query_map(
                rusqlite::named_params! {":start": start, ":end": end},
                map_transaction_row,
            )?
            .collect::<Result<Vec<_>, _>>(),
        TransactionFilter::TotalPrice { min, max } => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" \
                 WHERE total_price BETWEEN :min AND :max ORDER BY rowid ASC"
            ))?
            .query_map(
                rusqlite::named_params! {":min": min, ":max": max},
                map_transaction_row,
            )?
            .collect::<Result<Vec<_>, _>>(),
        TransactionFilter::Quantity { min, max } => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" \
                 WHERE quantity BETWEEN :min AND :max ORDER BY rowid ASC"
            ))?
            .query_map(
                rusqlite::named_params! {":min": min, ":max": max},
                map_transaction_row,
            )?
            .collect::<Result<Vec<_>, _>>(),
    };

    rows.map_err(|error| error.into())
}


#[cfg(test)]
mod filter_transactions_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        initialize_db,
        transaction::{
            Transaction, core::test_records::sample_transaction, import_transactions,
        },
    };

    use super::{TransactionFilter, filter_transactions};

    fn connection_with(records: &[Transaction]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        import_transactions(records, &conn).unwrap();
        conn
    }

    #[test]
    fn city_filter_is_case_insensitive_and_ordered() {
        let records = vec![
            sample_transaction("Delhi"),
            sample_transaction("Pune"),
            sample_transaction("Delhi"),
        ];
        let conn = connection_with(&records);

        let lowercase = filter_transactions(
            &TransactionFilter::City {
                name: "delhi".to_owned(),
            },
            &conn,
        )
        .unwrap();
        let titlecase = filter_transactions(
            &TransactionFilter::City {
                name: "Delhi".to_owned(),
            },
            &conn,
        )
        .unwrap();

        assert_eq!(lowercase, vec![records[0].clone(), records[2].clone()]);
        assert_eq!(lowercase, titlecase);
    }

    #[test]
    fn date_filter_includes_both_bounds() {
        let mut early = sample_transaction("Delhi");
        early.transaction_time = datetime!(2020-01-01 00:00:00);
        let mut middle = sample_transaction("Pune");
        middle.transaction_time = datetime!(2020-06-15 12:00:00);
        let mut late = sample_transaction("Mumbai");
        late.transaction_time = datetime!(2020-12-31 23:59:59);
        let mut outside = sample_transaction("Chennai");
        outside.transaction_time = datetime!(2021-01-01 00:00:00);

        let conn = connection_with(&[
            early.clone(),
            middle.clone(),
            late.clone(),
            outside,
        ]);

        let got = filter_transactions(
            &TransactionFilter::Date {
                start: datetime!(2020-01-01 00:00:00),
                end: datetime!(2020-12-31 23:59:59),
            },
            &conn,
        )
        .unwrap();

        assert_eq!(got, vec![early, middle, late]);
    }

    #[test]
    fn total_price_filter_matches_inclusive_range() {
        let mut cheap = sample_transaction("Delhi");
        cheap.total_price = 10.0;
        let mut mid = sample_transaction("Pune");
        mid.total_price = 50.0;
        let mut expensive = sample_transaction("Mumbai");
        expensive.total_price = 100.0;

        let conn = connection_with(&[cheap, mid.clone(), expensive]);

        let got = filter_transactions(
            &TransactionFilter::TotalPrice {
                min: 20.0,
                max: 60.0,
            },
            &conn,
        )
        .unwrap();

        assert_eq!(got, vec![mid]);
    }

    #[test]
    fn quantity_filter_matches_inclusive_range() {
        let mut one = sample_transaction("Delhi");
        one.quantity = 1;
        let mut five = sample_transaction("Pune");
        five.quantity = 5;
        let mut ten = sample_transaction("Mumbai");
        ten.quantity = 10;

        let conn = connection_with(&[one, five.clone(), ten.clone()]);

        let got = filter_transactions(
            &TransactionFilter::Quantity { min: 5, max: 10 },
            &conn,
        )
        .unwrap();

        assert_eq!(got, vec![five, ten]);
    }

    #[test]
    fn no_matches_is_an_empty_list() {
        let conn = connection_with(&[sample_transaction("Delhi")]);

        let got = filter_transactions(
            &TransactionFilter::City {
                name: "Atlantis".to_owned(),
            },
            &conn,
        )
        .unwrap();

        assert!(got.is_empty());
    }
}
