//! Defines the endpoints for reading people.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    database_id::PersonId,
    person::get_person,
    response::ApiResponse,
    store::EntityStore,
};

/// A route handler that responds with every person ordered by ID.
pub async fn get_people_endpoint(State(state): State<DatabaseState>) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match connection.list_people() {
        Ok(people) if people.is_empty() => ApiResponse::success(people)
            .with_message("No people registered.")
            .into_response(),
        Ok(people) => ApiResponse::success(people).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler that responds with a single person.
pub async fn get_person_endpoint(
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

    match get_person(person_id, &connection) {
        Ok(person) => ApiResponse::success(person).into_response(),
        Err(error) => error.into_response(),
    }
}
