//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, entity schemas, filters and domain error types.

pub mod errors;
pub mod filter;
pub mod repositories;
pub mod schema;

pub use errors::{DomainError, ValidationIssue};
pub use filter::{Comparison, Direction, Fields, Filter, FilterScope, Order, Where};
pub use repositories::*;
pub use schema::{BodyMode, EntitySchema, Property, PropertyKind, Record};
