pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::review::handlers as review;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog API
        .route("/api/v1/cvs", get(catalog::handle_load_catalog))
        .route("/api/v1/cvs/current", get(catalog::handle_current_catalog))
        .route("/api/v1/cvs/content", get(catalog::handle_cv_content))
        // Review API
        .route("/api/v1/reviews", post(review::handle_review_one))
        .route("/api/v1/reviews/batch", post(review::handle_review_batch))
        .route(
            "/api/v1/reviews/batch/cancel",
            post(review::handle_cancel_batch),
        )
        .route(
            "/api/v1/reviews/batch/status",
            get(review::handle_batch_status),
        )
        .route("/api/v1/rankings", get(review::handle_rankings))
        .route("/api/v1/rankings/export", get(review::handle_export))
        .with_state(state)
}
