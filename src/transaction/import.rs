//! Parsing uploaded CSV files into transaction records.
//!
//! Uploads are not assumed to be UTF-8: the bytes are run through an encoding
//! detector first and decoded with whatever encoding it guesses.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use serde::Deserialize;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::{Error, transaction::{Transaction, WIRE_DATETIME_FORMAT}};

/// One raw row of the import CSV, before the datetime is parsed.
#[derive(Debug, Deserialize)]
struct CsvRow {
    transaction_id: Uuid,
    transaction_time: String,
    product_name: String,
    quantity: i64,
    unit_price: f64,
    total_price: f64,
    delivered_to_city: String,
}

/// Parse the bytes of an uploaded CSV file into transaction records.
///
/// The expected header row is `transaction_id,transaction_time,product_name,
/// quantity,unit_price,total_price,delivered_to_city` with timestamps in the
/// wire format. Any malformed row fails the whole parse.
///
/// # Errors
///
/// Returns an [Error::InvalidCsv] naming the offending row if the payload
/// cannot be decoded or a row cannot be parsed.
pub fn parse_transactions_csv(bytes: &[u8]) -> Result<Vec<Transaction>, Error> {
    let text = decode_csv_bytes(bytes)?;

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut records = Vec::new();

    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|error| Error::InvalidCsv(error.to_string()))?;

        let transaction_time = PrimitiveDateTime::parse(&row.transaction_time, WIRE_DATETIME_FORMAT)
            .map_err(|error| {
                Error::InvalidCsv(format!(
                    "row {}: invalid transaction_time \"{}\": {error}",
                    index + 1,
                    row.transaction_time
                ))
            })?;

        records.push(Transaction {
            transaction_id: row.transaction_id,
            transaction_time,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
            delivered_to_city: row.delivered_to_city,
        });
    }

    Ok(records)
}

fn decode_csv_bytes(bytes: &[u8]) -> Result<String, Error> {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding: &'static Encoding = detector.guess(None, true);

    let (text, actual_encoding, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(Error::InvalidCsv(format!(
            "could not decode the file as {}",
            actual_encoding.name()
        )));
    }

    tracing::debug!(
        "decoded {} byte CSV upload as {}",
        bytes.len(),
        actual_encoding.name()
    );

    Ok(text.into_owned())
}
