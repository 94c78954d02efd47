//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::Serialize;

use super::DomainError;
use super::filter::{Filter, Where};
use super::schema::{EntitySchema, Record};

/// Result of count and bulk-update operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Count {
    pub count: u64,
}

/// Generic CRUD contract over entity type `T` keyed by `ID`
#[async_trait]
pub trait CrudRepository<T, ID>: Send + Sync {
    /// Schema of the entity this repository stores
    fn schema(&self) -> &'static EntitySchema;

    /// Insert a new record with a generated id
    async fn create(&self, record: Record) -> Result<T, DomainError>;

    /// Find records matching the filter
    async fn find(&self, filter: &Filter) -> Result<Vec<T>, DomainError>;

    /// Find one record, failing with `NotFound` when absent
    async fn find_by_id(&self, id: &ID) -> Result<T, DomainError>;

    /// Merge the record into every row matching `where`
    async fn update_all(&self, record: Record, r#where: Option<&Where>)
    -> Result<Count, DomainError>;

    /// Merge the record into the row with this id
    async fn update_by_id(&self, id: &ID, record: Record) -> Result<(), DomainError>;

    /// Overwrite every property of the row with this id
    async fn replace_by_id(&self, id: &ID, record: Record) -> Result<(), DomainError>;

    /// Delete the row with this id
    async fn delete_by_id(&self, id: &ID) -> Result<(), DomainError>;

    /// Count rows matching `where`
    async fn count(&self, r#where: Option<&Where>) -> Result<Count, DomainError>;
}
