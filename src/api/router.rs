//! Summary proxy router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the proxy router with permissive CORS, matching a browser client
/// served from a different origin.
pub fn summary_api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/openai/generate-summary",
            post(endpoints::summary::generate),
        )
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}
