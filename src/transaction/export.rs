//! Writing filtered query results to the export CSV file.

use std::path::Path;

use crate::{Error, transaction::{Transaction, WIRE_DATETIME_FORMAT}};

/// The header row of the export file, identical to the import format.
const EXPORT_HEADER: [&str; 7] = [
    "transaction_id",
    "transaction_time",
    "product_name",
    "quantity",
    "unit_price",
    "total_price",
    "delivered_to_city",
];

/// Serialize `records` to a CSV file at `path`, creating parent directories
/// as needed.
///
/// The column order matches the import format. `total_price` is recomputed
/// as `quantity * unit_price` on the way out, the stored value is ignored.
///
/// # Errors
///
/// Returns an [Error::ExportFailed] if the file cannot be written. Callers
/// treat the export as a side effect: they log this error instead of failing
/// the request that triggered it.
pub fn export_filter_results(records: &[Transaction], path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|error| Error::ExportFailed(error.to_string()))?;
    }

    let mut writer =
        csv::Writer::from_path(path).map_err(|error| Error::ExportFailed(error.to_string()))?;

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|error| Error::ExportFailed(error.to_string()))?;

    for record in records {
        let transaction_time = record
            .transaction_time
            .format(WIRE_DATETIME_FORMAT)
            .map_err(|error| Error::ExportFailed(error.to_string()))?;
        let total_price = record.quantity as f64 * record.unit_price;

        writer
            .write_record([
                record.transaction_id.to_string(),
                transaction_time,
                record.product_name.clone(),
                record.quantity.to_string(),
                record.unit_price.to_string(),
                total_price.to_string(),
                record.delivered_to_city.clone(),
            ])
            .map_err(|error| Error::ExportFailed(error.to_string()))?;
    }

    writer
        .flush()
        .map_err(|error| Error::ExportFailed(error.to_string()))?;

    Ok(())
}
