//! Webhook delivery correlation.
//!
//! Every delivery gets an id that ties together the connector's logs, the
//! Sentry event for a failed dispatch, and the caller's own records. The
//! platform plugin does not send one itself, so most ids are minted here;
//! an id supplied by a proxy in front of the service is kept.

use axum::extract::Request;
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Span;
use uuid::Uuid;

/// Header carrying the correlation id, inbound and outbound.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Middleware that stamps every request with a correlation id.
///
/// The id is recorded on the request span, tagged onto the Sentry scope so
/// a captured dispatch failure can be matched to the delivery that caused
/// it, and echoed in the response for the caller to quote.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        inbound_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// An id supplied by a proxy in front of the service, if it is printable
/// and non-empty.
fn inbound_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
    (!value.is_empty()).then(|| value.to_owned())
}
