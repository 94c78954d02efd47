//! HTTP rendering of domain errors
//!
//! Every failure leaves the API in the same envelope:
//! `{"error": {"statusCode", "name", "message", "code", "details"?}}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::domain::DomainError;

impl DomainError {
    pub fn status(&self) -> StatusCode {
        match self {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::InvalidParameter { .. } | DomainError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn name_and_code(&self) -> (&'static str, Option<&'static str>) {
        match self {
            DomainError::NotFound { .. } => ("NotFoundError", Some("ENTITY_NOT_FOUND")),
            DomainError::Validation(_) => ("UnprocessableEntityError", Some("VALIDATION_FAILED")),
            DomainError::InvalidParameter { .. } => ("BadRequestError", Some("INVALID_PARAMETER_VALUE")),
            DomainError::InvalidBody(_) => ("BadRequestError", Some("INVALID_REQUEST_BODY")),
            DomainError::Database(_) | DomainError::Internal(_) => ("InternalServerError", None),
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (name, code) = self.name_and_code();

        let message = match &self {
            // Store details stay in the log
            DomainError::Database(_) | DomainError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                "Internal Server Error".to_string()
            }
            DomainError::Validation(_) => {
                "The request body is invalid. See error object `details` property for more info."
                    .to_string()
            }
            other => other.to_string(),
        };

        let mut error = json!({
            "statusCode": status.as_u16(),
            "name": name,
            "message": message,
        });
        if let Some(code) = code {
            error["code"] = Value::from(code);
        }
        if let DomainError::Validation(issues) = &self {
            error["details"] = json!(issues);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Unwrap a JSON body, turning axum's rejection into the common error envelope.
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, DomainError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(DomainError::InvalidBody(rejection.body_text())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationIssue;

    async fn body_of(err: DomainError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_envelope() {
        let (status, body) = body_of(DomainError::not_found("Feedback", "f1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["statusCode"], 404);
        assert_eq!(body["error"]["code"], "ENTITY_NOT_FOUND");
        assert_eq!(
            body["error"]["message"],
            "Entity not found: Feedback with id \"f1\""
        );
    }

    #[tokio::test]
    async fn validation_lists_details() {
        let err = DomainError::Validation(vec![ValidationIssue::new(
            "",
            "required",
            "must have required property 'comment'",
        )]);
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["details"][0]["code"], "required");
    }

    #[tokio::test]
    async fn database_errors_are_not_leaked() {
        let (status, body) = body_of(DomainError::Database("disk I/O error".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Internal Server Error");
        assert!(body["error"].get("code").is_none());
    }
}
