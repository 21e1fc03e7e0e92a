pub mod health;
pub mod status;

use axum::{
    routing::{get, post},
    Router,
};
use service::status::StatusService;
use tower_http::{
    compression::CompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::observability;

/// State shared by every handler: the status service and, through it, the one
/// store connection opened at startup.
#[derive(Clone)]
pub struct AppState {
    pub status: StatusService,
}

impl AppState {
    pub fn new(status: StatusService) -> Self {
        Self { status }
    }
}

/// Status and health routes, relative to the configured prefix.
fn status_routes(state: AppState) -> Router {
    Router::new()
        .route("/:timeseries_id", post(status::set_status))
        .route("/import/:value_type/:request_id", get(status::get_import_status))
        .route("/export/:value_type/:request_id", get(status::get_export_status))
        .route(
            "/extension/:extension/:extension_function/:request_id",
            get(status::get_extension_status),
        )
        .route("/public/hc", get(health::health))
        .route("/hc", get(health::health))
        .with_state(state)
}

/// Build the full application router. `prefix` must start with `/` (see
/// `configs::ServerConfig::route_prefix`).
pub fn build_router(state: AppState, prefix: Option<&str>) -> Router {
    let routes = match prefix {
        Some(p) => Router::new().nest(p, status_routes(state)),
        None => status_routes(state),
    };

    routes
        .route("/metrics", get(observability::metrics))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
