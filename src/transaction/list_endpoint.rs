//! Defines the endpoint for listing transactions.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    response::ApiResponse,
    store::EntityStore,
    transaction::TransactionFilter,
};

/// A route handler that responds with the transactions matching the
/// optional `person_id` and `category_id` query parameters.
pub async fn get_transactions_endpoint(
    State(state): State<DatabaseState>,
    filter: Result<Query<TransactionFilter>, QueryRejection>,
) -> Response {
    let Query(filter) = match filter {
        Ok(filter) => filter,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match connection.list_transactions(&filter) {
        Ok(transactions) => ApiResponse::success(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}
