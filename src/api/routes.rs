use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use super::handlers::{
    cancel_order, create_order, fail, get_order, health, list_orders, me, not_found, panicking,
    pay_order, AppState,
};
use super::middleware::{logging_middleware, method_not_allowed_middleware};
use super::openapi::ApiDoc;
use crate::advice::handle_panic;
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health))
        // Orders
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order).delete(cancel_order))
        .route("/orders/:id/payment", post(pay_order))
        .route("/me", get(me))
        // Failure endpoints for exercising the UNKNOWN mapping
        .route("/debug/fail", get(fail))
        .route("/debug/panic", get(panicking))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .fallback(not_found)
        // Order matters: panics are caught closest to the handlers, bare 405s
        // are translated before logging and metrics see them.
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(method_not_allowed_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
