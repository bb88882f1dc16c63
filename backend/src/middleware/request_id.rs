use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const CORRELATION_ID_HEADER: &str = "x-correlation-id";
const MAX_INBOUND_ID_LEN: usize = 128;

/// Identifier attached to every request, echoed back in `x-request-id`.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

fn inbound_id(req: &Request) -> Option<String> {
    [REQUEST_ID_HEADER, CORRELATION_ID_HEADER]
        .into_iter()
        .filter_map(|name| req.headers().get(name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty() && value.len() <= MAX_INBOUND_ID_LEN)
        .map(str::to_string)
}

pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = inbound_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::debug_span!("request", request_id = %id);
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
