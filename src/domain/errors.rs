//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The API layer decides how each variant is rendered over HTTP.

use std::fmt;

/// One problem found while validating a request body against an entity schema
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationIssue {
    /// JSON pointer of the offending value, `""` for the body itself
    pub path: String,
    /// Short machine-readable reason (`required`, `type`, `additionalProperties`, ...)
    pub code: &'static str,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum DomainError {
    /// No record with the given id
    NotFound { entity: &'static str, id: String },
    /// Request body does not match the entity schema
    Validation(Vec<ValidationIssue>),
    /// A query parameter (filter, where) is malformed
    InvalidParameter { name: String, message: String },
    /// Request body is not valid JSON
    InvalidBody(String),
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_parameter(name: impl Into<String>, message: impl fmt::Display) -> Self {
        DomainError::InvalidParameter {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound { entity, id } => {
                write!(f, "Entity not found: {} with id {:?}", entity, id)
            }
            DomainError::Validation(issues) => {
                write!(f, "Validation error: {} issue(s)", issues.len())
            }
            DomainError::InvalidParameter { name, message } => {
                write!(f, "Invalid \"{}\" parameter: {}", name, message)
            }
            DomainError::InvalidBody(msg) => write!(f, "Invalid request body: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
