//! Defines the endpoint for recording a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    response::ApiResponse,
    store::EntityStore,
    transaction::{NewTransaction, Transaction, validate_and_prepare},
};

/// Look up the candidate's person and category in `store`, validate the
/// candidate and store it if it was accepted.
///
/// # Errors
/// Returns [Error::Rejected] if the candidate failed validation, or an error
/// from the store.
pub fn validate_and_store(
    candidate: NewTransaction,
    store: &impl EntityStore,
) -> Result<Transaction, Error> {
    let person = store.find_person(candidate.person_id)?;
    let category = store.find_category(candidate.category_id)?;

    let accepted = validate_and_prepare(candidate, person.as_ref(), category.as_ref())?;

    store.insert_transaction(accepted)
}

/// Validate and store `candidate` in one SQL transaction, so the person or
/// category cannot disappear between being checked and being referenced.
///
/// # Errors
/// Returns [Error::Rejected] if the candidate failed validation, or a
/// [Error::SqlError] if there is some SQL error.
pub fn record_transaction(
    candidate: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let transaction = validate_and_store(candidate, &*sql_transaction)?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// A route handler for recording a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<DatabaseState>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Response {
    let candidate = match payload {
        Ok(Json(candidate)) => candidate,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match record_transaction(candidate, &connection) {
        Ok(transaction) => {
            tracing::info!("recorded transaction {}", transaction.id);
            (
                StatusCode::CREATED,
                ApiResponse::success(transaction).with_message("Transaction recorded."),
            )
                .into_response()
        }
        Err(Error::Rejected(reason)) => {
            tracing::info!("rejected transaction: {reason}");
            Error::Rejected(reason).into_response()
        }
        Err(error) => {
            tracing::error!("could not record transaction: {error}");
            error.into_response()
        }
    }
}
