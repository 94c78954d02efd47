use crate::api;
use crate::domain::Count;
use crate::models::Feedback;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::feedback::create_feedback,
        api::feedback::count_feedbacks,
        api::feedback::list_feedbacks,
        api::feedback::update_all_feedbacks,
        api::feedback::get_feedback,
        api::feedback::update_feedback,
        api::feedback::replace_feedback,
        api::feedback::delete_feedback,
    ),
    components(
        schemas(
            Feedback,
            Count,
            api::feedback::NewFeedback,
            api::feedback::FeedbackPartial,
        )
    ),
    tags(
        (name = "feedback", description = "Feedback CRUD"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_feedback_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for path in ["/feedbacks", "/feedbacks/count", "/feedbacks/{id}", "/health"] {
            assert!(paths.iter().any(|p| p.as_str() == path), "missing {path}");
        }
    }
}
