//! Defines the endpoint for listing categories.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    app_state::{DatabaseState, lock_connection},
    response::ApiResponse,
    store::EntityStore,
};

/// A route handler that responds with every category ordered by ID.
pub async fn get_categories_endpoint(State(state): State<DatabaseState>) -> Response {
    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match connection.list_categories() {
        Ok(categories) if categories.is_empty() => ApiResponse::success(categories)
            .with_message("No categories registered.")
            .into_response(),
        Ok(categories) => ApiResponse::success(categories).into_response(),
        Err(error) => error.into_response(),
    }
}
