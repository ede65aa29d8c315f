//! Defines the endpoint for creating a new category.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    category::{Category, CategoryForm},
    response::ApiResponse,
    store::EntityStore,
};

/// Validate `form` and add the category to `store`.
///
/// # Errors
/// Returns [Error::EmptyCategoryDescription] for a blank description, or an
/// error from the store.
pub fn create_category(form: &CategoryForm, store: &impl EntityStore) -> Result<Category, Error> {
    let category = form.validate()?;

    store.insert_category(category)
}

/// A route handler for creating a new category, responds with the stored category.
pub async fn create_category_endpoint(
    State(state): State<DatabaseState>,
    payload: Result<Json<CategoryForm>, JsonRejection>,
) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match create_category(&form, &*connection) {
        Ok(category) => {
            tracing::info!("created category {}", category.id);
            (
                StatusCode::CREATED,
                ApiResponse::success(category).with_message("Category created."),
            )
                .into_response()
        }
        Err(error) => {
            tracing::debug!("could not create category: {error}");
            error.into_response()
        }
    }
}
