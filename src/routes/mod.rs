mod backups;
mod daemon;
mod dashboard;
mod devices;
mod system;

use crate::middlewares::request_id::{RequestId, RequestIdLayer};
use crate::state::AppState;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tracing::Span;

pub fn build() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/api/health", get(system::health))
        .route("/api/version", get(system::version))
        // ======== daemon ========
        .route("/fetch/{device}", get(daemon::fetch_device))
        .route("/reload", get(daemon::reload_nodes))
        // ======== backups ========
        .route("/view/{device}", get(backups::view_latest))
        .route("/logs/{device}", get(backups::history))
        .route("/logs/{device}/{*path}", get(backups::read_history_file))
        .route("/monitor/{device}", get(backups::monitor))
        .route("/prune", get(backups::prune))
        .route("/save_config", post(backups::save_config))
        // ======== registry ========
        .route("/add_device", post(devices::add))
        .route("/edit_device", post(devices::edit))
        .route("/delete_device/{device}", post(devices::delete))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request.extensions().get::<RequestId>().unwrap();
                    tracing::debug_span!(
                        "request",
                        request_id = %request_id,
                    )
                })
                .on_request(|req: &Request<Body>, _span: &Span| {
                    tracing::trace!(
                        method = %req.method(),
                        uri = %req.uri(),
                        version = %format!("{:?}", req.version()),
                        "started processing request"
                    );
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::trace!(
                        status = ?res.status(),
                        latency = %format!("{}ms", latency.as_millis()),
                        "finished processing request"
                    );
                }),
        )
        .layer(RequestIdLayer::new())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any),
        )
}
