//! Defines the endpoint for deleting a person along with their transactions.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    cascade::delete_person_cascade,
    database_id::PersonId,
    response::ApiResponse,
};

/// A route handler for deleting a person and every transaction that refers to them.
///
/// Responds with what was removed.
pub async fn delete_person_endpoint(
    State(state): State<DatabaseState>,
    person_id: Result<Path<PersonId>, PathRejection>,
) -> Response {
    let Path(person_id) = match person_id {
        Ok(person_id) => person_id,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match delete_person_cascade(person_id, &connection) {
        Ok(plan) => {
            tracing::info!(
                "deleted person {person_id} and {} transactions",
                plan.transactions_to_remove.len()
            );
            let message = format!(
                "Person deleted along with {} transaction(s).",
                plan.transactions_to_remove.len()
            );
            ApiResponse::success(plan)
                .with_message(message)
                .into_response()
        }
        Err(error) => {
            tracing::debug!("could not delete person {person_id}: {error}");
            error.into_response()
        }
    }
}
