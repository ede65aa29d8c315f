//! The JSON envelope that every API response is wrapped in.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// A response body of the form `{"data": ..., "message": "...", "success": true}`.
///
/// `data` is `null` when the request failed, in which case `message` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// The payload of a successful request.
    pub data: Option<T>,
    /// A human readable note about the outcome, may be empty.
    pub message: String,
    /// Whether the request succeeded.
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: String::new(),
            success: true,
        }
    }

    /// Attach a message to the response.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl ApiResponse<()> {
    /// A failed response with no payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            success: false,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
