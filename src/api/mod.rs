pub mod error;
pub mod feedback;
pub mod health;
pub mod query;

use axum::{Router, routing::get};

use crate::infrastructure::AppState;

/// Route table of the REST API
pub fn api_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Feedback
        .route(
            "/feedbacks",
            get(feedback::list_feedbacks)
                .post(feedback::create_feedback)
                .patch(feedback::update_all_feedbacks),
        )
        .route("/feedbacks/count", get(feedback::count_feedbacks))
        .route(
            "/feedbacks/:id",
            get(feedback::get_feedback)
                .patch(feedback::update_feedback)
                .put(feedback::replace_feedback)
                .delete(feedback::delete_feedback),
        )
        .with_state(state)
}
