//! HTTP surface. Every handler delegates to `ops` and maps failures through `ApiError`.

mod error;
mod handlers;
pub mod ops;
mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use error::ApiError;
pub use state::AppContext;

/// Assemble the full application router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    handlers::routes()
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
