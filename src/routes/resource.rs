//! Resource routes. Path segments are validated by the `ResourcePath` extractor, never here.

use crate::error::AppError;
use crate::handlers::resource::{catalog, create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// GET / catalog; GET|POST /:table; GET|PUT|DELETE /:table/:id.
pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(catalog))
        .route("/:table", get(list).post(create))
        .route("/:table/:id", get(read).put(update).delete(delete_handler))
        .fallback(|| async { AppError::NotFound("Route not found.".into()) })
        .with_state(state)
}

/// Resource routes with request tracing and a request body cap.
pub fn router(state: AppState, body_limit: usize) -> Router {
    resource_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(body_limit)),
    )
}
