//! Request-id propagation.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use catalog_observability::{RequestId, REQUEST_ID_HEADER};
use http::HeaderValue;
use tracing::Instrument;

/// Reuse the caller's `X-Request-Id` or generate one, run the request
/// inside a span carrying it, and echo it on the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = RequestId::from_header(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
    );
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).instrument(id.span()).await;
    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
