//! The fallback handler for routes that do not exist.

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::response::ApiResponse;

/// Respond with a 404 in the usual JSON envelope.
pub async fn get_404_not_found(uri: Uri) -> Response {
    tracing::debug!("no route for {uri}");

    (
        StatusCode::NOT_FOUND,
        ApiResponse::failure(format!("no route for {}", uri.path())),
    )
        .into_response()
}
