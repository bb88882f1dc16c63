use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 1024;

/// Logs every 4xx/5xx response with method, uri, latency and a body preview.
/// The body is buffered and forwarded unchanged.
pub async fn log_error_responses(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    let (body, preview) = match to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
        Ok(bytes) => {
            let preview = preview(&bytes);
            (Body::from(bytes), preview)
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            (Body::empty(), format!("<unreadable body: {}>", err))
        }
    };

    if status.is_server_error() {
        tracing::error!(
            status = status.as_u16(),
            %method,
            %uri,
            request_id,
            latency_ms,
            body = %preview,
            "request failed"
        );
    } else {
        tracing::warn!(
            status = status.as_u16(),
            %method,
            %uri,
            request_id,
            latency_ms,
            body = %preview,
            "request rejected"
        );
    }

    Response::from_parts(parts, body)
}

fn preview(bytes: &Bytes) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use axum::{http::StatusCode, middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn error_body_is_forwarded_intact() {
        let app = Router::new()
            .route(
                "/missing",
                get(|| async { (StatusCode::NOT_FOUND, "no such card") }),
            )
            .layer(from_fn(log_error_responses));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(&bytes[..], b"no such card");
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = Bytes::from(vec![b'a'; MAX_LOGGED_BODY_BYTES + 10]);
        let text = preview(&long);
        assert!(text.ends_with(&format!("(truncated, {} bytes total)", MAX_LOGGED_BODY_BYTES + 10)));
    }
}
