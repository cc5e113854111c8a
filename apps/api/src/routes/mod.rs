pub mod health;
pub mod resume;

use axum::{http::Uri, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/resume", get(resume::handle_get_resume))
        .route("/resume", get(resume::handle_get_resume))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The front-end is hosted separately; any origin may call us.
        .layer(CorsLayer::permissive())
}
