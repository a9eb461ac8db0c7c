//! Request IDs for request tracing and correlation.
//!
//! `SetRequestIdLayer` assigns a UUID v4 unless an upstream proxy already sent
//! `x-request-id`. The ID is:
//! - Recorded on the request's tracing span
//! - Added to the Sentry scope for error correlation
//! - Returned in the response headers by `PropagateRequestIdLayer`

use axum::{
    Router,
    extract::Request,
    http::HeaderName,
    middleware::{Next, from_fn},
    response::Response,
};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use tracing::Span;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn request_id(request: &Request) -> &str {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
}

/// Tracing span for one request, tagged with its request ID.
pub fn make_request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}

/// Tag the Sentry scope with the request ID.
pub async fn sentry_request_id(request: Request, next: Next) -> Response {
    let id = request_id(&request).to_owned();
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &id);
    });
    next.run(request).await
}

/// Wrap a router with request ID assignment, request tracing and
/// propagation of the ID to the response.
pub fn with_request_id<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    // Outermost last: the ID is set before the span is made
    router
        .layer(from_fn(sentry_request_id))
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::new(header, MakeRequestUuid))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{body::Body, body::to_bytes, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        with_request_id(Router::new().route(
            "/",
            get(|request: Request| async move { request_id(&request).to_owned() }),
        ))
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_owned();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);

        // Handlers see the same ID the client gets back
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), id.as_bytes());
    }

    #[tokio::test]
    async fn test_keeps_upstream_request_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "edge-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "edge-42");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), b"edge-42");
    }

    #[tokio::test]
    async fn test_ids_differ_between_requests() {
        let first = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let second = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_ne!(
            first.headers()[REQUEST_ID_HEADER],
            second.headers()[REQUEST_ID_HEADER]
        );
    }
}
