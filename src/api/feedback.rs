//! Feedback API handlers using repository pattern
//!
//! Each handler validates its input against the Feedback schema and forwards
//! it to the feedback repository unchanged.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::error::json_body;
use super::query::QueryParams;
use crate::domain::{BodyMode, Count, DomainError, Fields, Filter, FilterScope, Where};
use crate::infrastructure::AppState;

/// `filter` query parameter (JSON)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// e.g. `{"where":{"rating":{"gte":4}},"order":"rating DESC","limit":10}`
    pub filter: Option<String>,
}

/// `where` query parameter (JSON)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WhereQuery {
    /// e.g. `{"comment":{"like":"%great%"}}`
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
}

/// Body of `POST /feedbacks`
#[derive(Debug, ToSchema)]
pub struct NewFeedback {
    pub comment: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: Option<i32>,
}

/// Body of `PATCH` requests; every property optional
#[derive(Debug, ToSchema)]
pub struct FeedbackPartial {
    pub comment: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: Option<i32>,
}

/// Serialize entities, keeping only the requested fields
fn project<T: Serialize>(item: &T, fields: Option<&Fields>) -> Result<Value, DomainError> {
    let value = serde_json::to_value(item).map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(match fields {
        Some(fields) => fields.project(value),
        None => value,
    })
}

#[utoipa::path(
    post,
    path = "/feedbacks",
    tag = "feedback",
    request_body = NewFeedback,
    responses(
        (status = 200, description = "Feedback model instance", body = Feedback),
        (status = 422, description = "Body does not match the Feedback schema")
    )
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, DomainError> {
    let repo = &state.feedback_repo;
    let record = repo.schema().validate(&json_body(payload)?, BodyMode::Create)?;

    let feedback = repo.create(record).await?;
    Ok(Json(project(&feedback, None)?))
}

#[utoipa::path(
    get,
    path = "/feedbacks/count",
    tag = "feedback",
    params(WhereQuery),
    responses(
        (status = 200, description = "Feedback model count", body = Count),
        (status = 400, description = "Malformed where clause")
    )
)]
pub async fn count_feedbacks(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<WhereQuery>,
) -> Result<Json<Count>, DomainError> {
    let repo = &state.feedback_repo;
    let r#where = Where::from_query(query.where_clause.as_deref(), repo.schema())?;

    Ok(Json(repo.count(r#where.as_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/feedbacks",
    tag = "feedback",
    params(FilterQuery),
    responses(
        (status = 200, description = "Array of Feedback model instances", body = [Feedback]),
        (status = 400, description = "Malformed filter")
    )
)]
pub async fn list_feedbacks(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FilterQuery>,
) -> Result<Json<Vec<Value>>, DomainError> {
    let repo = &state.feedback_repo;
    let filter = Filter::from_query(query.filter.as_deref(), repo.schema(), FilterScope::Full)?;

    let feedbacks = repo.find(&filter).await?;
    let items = feedbacks
        .iter()
        .map(|f| project(f, filter.fields.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(items))
}

#[utoipa::path(
    patch,
    path = "/feedbacks",
    tag = "feedback",
    params(WhereQuery),
    request_body = FeedbackPartial,
    responses(
        (status = 200, description = "Feedback PATCH success count", body = Count),
        (status = 422, description = "Body does not match the Feedback schema")
    )
)]
pub async fn update_all_feedbacks(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<WhereQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Count>, DomainError> {
    let repo = &state.feedback_repo;
    let r#where = Where::from_query(query.where_clause.as_deref(), repo.schema())?;
    let record = repo.schema().validate(&json_body(payload)?, BodyMode::Partial)?;

    Ok(Json(repo.update_all(record, r#where.as_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/feedbacks/{id}",
    tag = "feedback",
    params(("id" = String, Path, description = "Feedback id"), FilterQuery),
    responses(
        (status = 200, description = "Feedback model instance", body = Feedback),
        (status = 404, description = "No feedback with this id")
    )
)]
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    QueryParams(query): QueryParams<FilterQuery>,
) -> Result<Json<Value>, DomainError> {
    let repo = &state.feedback_repo;
    let filter = Filter::from_query(
        query.filter.as_deref(),
        repo.schema(),
        FilterScope::ExcludingWhere,
    )?;

    let feedback = repo.find_by_id(&id).await?;
    Ok(Json(project(&feedback, filter.fields.as_ref())?))
}

#[utoipa::path(
    patch,
    path = "/feedbacks/{id}",
    tag = "feedback",
    params(("id" = String, Path, description = "Feedback id")),
    request_body = FeedbackPartial,
    responses(
        (status = 204, description = "Feedback PATCH success"),
        (status = 404, description = "No feedback with this id")
    )
)]
pub async fn update_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, DomainError> {
    let repo = &state.feedback_repo;
    let record = repo.schema().validate(&json_body(payload)?, BodyMode::Partial)?;

    repo.update_by_id(&id, record).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/feedbacks/{id}",
    tag = "feedback",
    params(("id" = String, Path, description = "Feedback id")),
    request_body = NewFeedback,
    responses(
        (status = 204, description = "Feedback PUT success"),
        (status = 404, description = "No feedback with this id")
    )
)]
pub async fn replace_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, DomainError> {
    let repo = &state.feedback_repo;
    let record = repo
        .schema()
        .validate(&json_body(payload)?, BodyMode::Replace(&id))?;

    repo.replace_by_id(&id, record).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/feedbacks/{id}",
    tag = "feedback",
    params(("id" = String, Path, description = "Feedback id")),
    responses(
        (status = 204, description = "Feedback DELETE success"),
        (status = 404, description = "No feedback with this id")
    )
)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, DomainError> {
    state.feedback_repo.delete_by_id(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
