//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::{FromRequest, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::OPERATION_FAILED, response::ApiResponse};

/// The number of bytes of a request or response body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Bodies are passed on byte for byte. Request bodies over axum's default
/// body limit (2 MiB) are refused with `413 Payload Too Large`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match Bytes::from_request(Request::new(body), &()).await {
        Ok(body_bytes) => body_bytes,
        Err(rejection) => {
            tracing::error!("could not read request body: {}", rejection.body_text());
            return (
                rejection.status(),
                ApiResponse::failure(rejection.body_text()),
            )
                .into_response();
        }
    };
    log_request(&parts, &String::from_utf8_lossy(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::failure(OPERATION_FAILED),
            )
                .into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a
/// character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let end = (0..=limit)
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    &text[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Bytes, http::StatusCode, middleware, routing::post};
    use axum_test::TestServer;

    use super::{logging_middleware, truncate};

    fn get_echo_server() -> TestServer {
        let app = Router::new()
            .route("/echo", post(|body: Bytes| async move { body }))
            .layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).unwrap()
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("short", 64), "short");
    }

    #[test]
    fn truncate_cuts_at_limit() {
        assert_eq!(truncate("abcdef", 3), "abc");
    }

    #[test]
    fn truncate_does_not_split_characters() {
        // 'ç' is two bytes, so byte 3 is in the middle of it.
        assert_eq!(truncate("Maçã", 3), "Ma");
    }

    #[tokio::test]
    async fn middleware_passes_bodies_through() {
        let server = get_echo_server();
        let body = "x".repeat(200);

        let response = server.post("/echo").text(body.clone()).await;

        response.assert_status_ok();
        response.assert_text(body);
    }

    #[tokio::test]
    async fn middleware_passes_invalid_utf8_through_unchanged() {
        let server = get_echo_server();
        let body: &'static [u8] = &[0x41, 0xff, 0x42];

        let response = server.post("/echo").bytes(Bytes::from_static(body)).await;

        response.assert_status_ok();
        assert_eq!(response.as_bytes().as_ref(), body);
    }

    #[tokio::test]
    async fn middleware_refuses_oversized_request_body() {
        // The handler ignores the body, so only the middleware can refuse it.
        let app = Router::new()
            .route("/ignore", post(|| async { "ok" }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).unwrap();
        let body = vec![b'x'; 3 * 1024 * 1024];

        let response = server.post("/ignore").bytes(Bytes::from(body)).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}
