//! Defines the endpoint for creating a new person.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    endpoints::{self, format_endpoint},
    person::{Person, PersonForm},
    response::ApiResponse,
    store::EntityStore,
};

/// Validate `form` and add the person to `store`.
///
/// # Errors
/// Returns [Error::EmptyPersonName] or [Error::InvalidAge] for bad input, or
/// an error from the store.
pub fn create_person(form: &PersonForm, store: &impl EntityStore) -> Result<Person, Error> {
    let person = form.validate()?;

    store.insert_person(person)
}

/// A route handler for creating a new person, responds with the stored person.
pub async fn create_person_endpoint(
    State(state): State<DatabaseState>,
    payload: Result<Json<PersonForm>, JsonRejection>,
) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match create_person(&form, &*connection) {
        Ok(person) => {
            tracing::info!("created person {}", person.id);
            let location = format_endpoint(endpoints::PERSON, person.id);
            (
                StatusCode::CREATED,
                [(LOCATION, location)],
                ApiResponse::success(person).with_message("Person created."),
            )
                .into_response()
        }
        Err(error) => {
            tracing::debug!("could not create person: {error}");
            error.into_response()
        }
    }
}
