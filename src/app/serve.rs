use std::time::Duration;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing::{field, Span};

use crate::{
    web::{midware, routes::routes, REQUEST_ID_HEADER},
    App, Result,
};

/// Serves the relay until the listener fails.
///
/// Every request gets an `x-request-id`, a `request` span and the JSON error body mapping.
pub async fn serve(app: App) -> Result<()> {
    let App {
        app_state,
        listener,
    } = app;

    axum::serve(listener, router(routes(app_state))).await?;

    Ok(())
}

fn router(routes: Router) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Requests go through the layers top to bottom, responses bottom to top.
    routes.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(request_trace_layer())
            .layer(middleware::map_response(midware::response_mapper))
            .layer(PropagateRequestIdLayer::new(request_id)),
    )
}

fn request_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<Body> + Clone,
    (),
    impl OnResponse<Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(request_span)
        .on_request(())
        .on_response(record_response)
}

/// `status` and `latency_ms` stay empty until the response is ready.
fn request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .unwrap_or_default();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| req.uri().path());

    tracing::info_span!(
        "request",
        request_id,
        method = %req.method(),
        route,
        status = field::Empty,
        latency_ms = field::Empty,
    )
}

fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", res.status().as_u16());
    span.record("latency_ms", latency.as_millis() as u64);
}
