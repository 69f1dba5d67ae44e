use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
    http::StatusCode,
};
use serde::Serialize;

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    transaction::{import_transactions, parse_transactions_csv},
};

/// The response body of a successful CSV import.
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    /// How many transactions the upload added to the store.
    pub imported: usize,
}

/// A route handler for importing transactions from an uploaded CSV file.
///
/// The upload is all-or-nothing: all rows of all uploaded files are inserted
/// inside a single SQL transaction, and any malformed row or ID collision
/// rejects the entire upload.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotCsv] (400) if an uploaded file is not CSV,
/// - [Error::InvalidCsv] (400) if a file cannot be decoded or parsed,
/// - [Error::DuplicateTransactionId] (409) if a row's ID already exists.
pub async fn import_transactions_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportSummary>), Error> {
    let mut records = Vec::new();
    let mut file_count = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let csv_bytes = read_csv_field(field).await?;
        records.extend(parse_transactions_csv(&csv_bytes)?);
        file_count += 1;
    }

    if file_count == 0 {
        return Err(Error::MultipartError(
            "the form did not contain a CSV file".to_owned(),
        ));
    }

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLock
    })?;

    let imported = import_transactions(&records, &connection)?;

    tracing::info!("imported {imported} transactions from {file_count} CSV file(s)");

    Ok((StatusCode::CREATED, Json(ImportSummary { imported })))
}

async fn read_csv_field(field: Field<'_>) -> Result<Vec<u8>, Error> {
    if field.content_type() != Some("text/csv") {
        return Err(Error::NotCsv);
    }

    let file_name = field.file_name().unwrap_or("<unnamed>").to_owned();

    // Raw bytes, not text: the encoding is sniffed during parsing.
    let data = field.bytes().await.map_err(|error| {
        tracing::error!("could not read data from multipart form field: {error}");
        Error::MultipartError("could not read data from multipart form field".to_owned())
    })?;

    tracing::debug!("received file '{}' that is {} bytes", file_name, data.len());

    Ok(data.to_vec())
}
