use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    AppState, Error,
    auth::AuthenticatedUser,
    transaction::{
        FilterParams, Transaction, TransactionFilter, export_filter_results, filter_transactions,
    },
};

/// A route handler for filtered transaction queries.
///
/// When `save_as_csv` is set, the result set is additionally written to the
/// configured export file. The export is fire-and-forget: a failed write is
/// logged and the request still succeeds.
///
/// # Errors
///
/// Returns an [Error::UnknownFilterParameter] (400) for an unsupported
/// `filter_parameter` and an [Error::Validation] (422) for missing or
/// malformed filter arguments.
pub async fn filter_transactions_endpoint(
    State(state): State<AppState>,
    _: AuthenticatedUser,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = TransactionFilter::from_params(&params)?;

    let records = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLock
        })?;

        filter_transactions(&filter, &connection)?
    };

    if params.save_as_csv {
        match export_filter_results(&records, &state.export_path) {
            Ok(()) => tracing::info!(
                "wrote {} filter results to {}",
                records.len(),
                state.export_path.display()
            ),
            Err(error) => tracing::error!(
                "could not write filter results to {}: {error}",
                state.export_path.display()
            ),
        }
    }

    Ok(Json(records))
}

#[cfg(test)]
mod filter_transactions_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::{
        AppState, build_router, endpoints,
        test_utils::{sign_in_as_admin, test_state_with_admin},
        transaction::{Transaction, core::test_records::sample_transaction, import_transactions},
    };

    fn state_with_records(records: &[Transaction]) -> AppState {
        let state = test_state_with_admin();
        {
            let connection = state.db_connection.lock().unwrap();
            import_transactions(records, &connection).unwrap();
        }
        state
    }

    #[tokio::test]
    async fn filter_by_city_is_case_insensitive() {
        let records = vec![
            sample_transaction("Delhi"),
            sample_transaction("Pune"),
            sample_transaction("Delhi"),
        ];
        let state = state_with_records(&records);
        let server = TestServer::new(build_router(state)).unwrap();
        let token = sign_in_as_admin(&server).await;

        let response = server
            .get(endpoints::FILTER)
            .add_query_param("filter_parameter", "city")
            .add_query_param("city_name", "delhi")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Vec<Value>>();
        assert_eq!(body.len(), 2);
        assert_eq!(
            body[0]["transaction_id"],
            records[0].transaction_id.to_string()
        );
        assert_eq!(
            body[1]["transaction_id"],
            records[2].transaction_id.to_string(),
            "results must keep insertion order"
        );
    }

    #[tokio::test]
    async fn unknown_filter_parameter_is_a_bad_request() {
        let state = state_with_records(&[sample_transaction("Delhi")]);
        let server = TestServer::new(build_router(state)).unwrap();
        let token = sign_in_as_admin(&server).await;

        let response = server
            .get(endpoints::FILTER)
            .add_query_param("filter_parameter", "colour")
            .authorization_bearer(&token)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert!(
            body["error"].as_str().unwrap().contains("colour"),
            "the error should name the unknown parameter: {body}"
        );
    }

    #[tokio::test]
    async fn malformed_date_bound_is_a_validation_error() {
        let state = state_with_records(&[sample_transaction("Delhi")]);
        let server = TestServer::new(build_router(state)).unwrap();
        let token = sign_in_as_admin(&server).await;

        server
            .get(endpoints::FILTER)
            .add_query_param("filter_parameter", "date")
            .add_query_param("range_start", "yesterday")
            .add_query_param("range_end", "20201231 235959")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn quantity_filter_uses_numeric_bounds() {
        let mut few = sample_transaction("Delhi");
        few.quantity = 2;
        let mut many = sample_transaction("Pune");
        many.quantity = 50;
        let state = state_with_records(&[few, many.clone()]);
        let server = TestServer::new(build_router(state)).unwrap();
        let token = sign_in_as_admin(&server).await;

        let response = server
            .get(endpoints::FILTER)
            .add_query_param("filter_parameter", "quantity")
            .add_query_param("range_start", "10")
            .add_query_param("range_end", "100")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Vec<Value>>();
        assert_eq!(body.len(), 1);
        assert_eq!(
            body[0]["transaction_id"],
            many.transaction_id.to_string()
        );
    }

    #[tokio::test]
    async fn save_as_csv_writes_the_export_file() {
        let record = sample_transaction("Delhi");
        let state = state_with_records(std::slice::from_ref(&record));
        let export_path = state.export_path.clone();
        let server = TestServer::new(build_router(state)).unwrap();
        let token = sign_in_as_admin(&server).await;

        server
            .get(endpoints::FILTER)
            .add_query_param("filter_parameter", "city")
            .add_query_param("city_name", "Delhi")
            .add_query_param("save_as_csv", true)
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let contents = std::fs::read_to_string(&export_path).unwrap();
        assert!(contents.contains(&record.transaction_id.to_string()));

        std::fs::remove_file(&export_path).ok();
    }

    #[tokio::test]
    async fn failed_export_does_not_fail_the_request() {
        let mut state = state_with_records(&[sample_transaction("Delhi")]);
        // Pointing the export below an existing file makes the write fail.
        let blocking_file = std::env::temp_dir().join(format!(
            "salebook-blocker-{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&blocking_file, b"").unwrap();
        state.export_path = blocking_file.join("filter_results.csv");

        let server = TestServer::new(build_router(state)).unwrap();
        let token = sign_in_as_admin(&server).await;

        server
            .get(endpoints::FILTER)
            .add_query_param("filter_parameter", "city")
            .add_query_param("city_name", "Delhi")
            .add_query_param("save_as_csv", true)
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        std::fs::remove_file(&blocking_file).ok();
    }

    #[tokio::test]
    async fn rejects_missing_token() {
        let state = state_with_records(&[sample_transaction("Delhi")]);
        let server = TestServer::new(build_router(state)).unwrap();

        server
            .get(endpoints::FILTER)
            .add_query_param("filter_parameter", "city")
            .add_query_param("city_name", "Delhi")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
