//! Router setup and configuration.

use axum::{
    Router,
    extract::Request,
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::Span;

use crate::api::handlers::{health, shorturl, tracker};
use crate::api::middleware::metrics::track_metrics;
use crate::api::state::AppState;

/// Create the main application router.
///
/// The tracker and shortener route sets are mounted according to
/// `server.mode`; health, metrics and static files are always served.
pub fn create_router(state: AppState) -> Router {
    let mode = state.config.server.mode;
    let static_files = &state.config.static_files;

    // Health and metrics routes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/metrics", get(health::metrics));

    let mut api_routes = Router::new();

    if mode.serves_tracker() {
        api_routes = api_routes
            .route("/users", post(tracker::create_user).get(tracker::list_users))
            .route("/users/{id}/exercises", post(tracker::add_exercise))
            .route("/users/{id}/logs", get(tracker::get_logs));
    }

    if mode.serves_shortener() {
        api_routes = api_routes
            .route("/shorturl", post(shorturl::shorten))
            .route("/shorturl/{short_url}", get(shorturl::redirect));
    }

    // Static landing page and assets
    let index = ServeFile::new(static_files.views_dir.join("index.html"));
    let public = ServeDir::new(&static_files.public_dir);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes.route_layer(middleware::from_fn(track_metrics)))
        .route_service("/", index)
        .nest_service("/public", public)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CorsLayer::permissive())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

/// Request span carrying the id set by `SetRequestIdLayer`.
fn make_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}
