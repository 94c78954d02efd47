//! SeaORM implementation of CrudRepository
//!
//! One generic implementation serves every entity. It is parameterized by the
//! entity's ActiveModel and driven by the entity's static schema.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::condition::{column, db_value, where_condition};
use crate::domain::{
    Count, CrudRepository, Direction, DomainError, EntitySchema, Filter, Record,
    ValidationIssue, Where,
};

type EntityOf<A> = <A as ActiveModelTrait>::Entity;
type ModelOf<A> = <EntityOf<A> as EntityTrait>::Model;
type ColumnOf<A> = <EntityOf<A> as EntityTrait>::Column;

/// SQLite rejects OFFSET without LIMIT
const NO_LIMIT: u64 = i64::MAX as u64;

/// SeaORM-based implementation of CrudRepository for the entity behind `A`
pub struct SeaOrmCrudRepository<A> {
    db: DatabaseConnection,
    schema: &'static EntitySchema,
    _model: PhantomData<fn() -> A>,
}

impl<A> SeaOrmCrudRepository<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: IntoActiveModel<A> + Send + Sync,
{
    pub fn new(db: DatabaseConnection, schema: &'static EntitySchema) -> Self {
        Self {
            db,
            schema,
            _model: PhantomData,
        }
    }

    fn column(&self, name: &str) -> Result<ColumnOf<A>, DomainError> {
        column::<ColumnOf<A>>(self.schema, name)
    }

    /// ActiveModel with exactly the record's properties set
    fn active_model(&self, record: &Record) -> Result<A, DomainError> {
        let mut active = <A as ActiveModelTrait>::default();
        for (name, value) in record.iter() {
            let property = self.schema.property(name).ok_or_else(|| {
                DomainError::Validation(vec![ValidationIssue::new(
                    "",
                    "additionalProperties",
                    format!("must NOT have additional property '{}'", name),
                )])
            })?;
            active.set(self.column(name)?, db_value(name, property.kind, value)?);
        }
        Ok(active)
    }

    fn id_condition(&self, id: &str) -> Result<Condition, DomainError> {
        Ok(Condition::all().add(self.column(self.schema.id)?.eq(id)))
    }

    /// Apply the record to every row matching the condition; returns rows affected.
    async fn update_matching(&self, record: &Record, condition: Condition) -> Result<u64, DomainError> {
        if record.is_empty() {
            // Nothing to write: report how many rows would have been touched
            let matched = EntityOf::<A>::find()
                .filter(condition)
                .count(&self.db)
                .await?;
            return Ok(matched);
        }

        let result = EntityOf::<A>::update_many()
            .set(self.active_model(record)?)
            .filter(condition)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl<A> CrudRepository<ModelOf<A>, String> for SeaOrmCrudRepository<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: IntoActiveModel<A> + Send + Sync,
{
    fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    async fn create(&self, record: Record) -> Result<ModelOf<A>, DomainError> {
        let id = Uuid::new_v4().to_string();

        let mut active = self.active_model(&record)?;
        active.set(self.column(self.schema.id)?, id.clone().into());

        let model = active.insert(&self.db).await?;
        tracing::debug!("Created {} {}", self.schema.name, id);
        Ok(model)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<ModelOf<A>>, DomainError> {
        let mut query = EntityOf::<A>::find().filter(where_condition::<ColumnOf<A>>(
            self.schema,
            filter.r#where.as_ref(),
        )?);

        for order in &filter.order {
            let column = self.column(&order.property)?;
            query = match order.direction {
                Direction::Asc => query.order_by_asc(column),
                Direction::Desc => query.order_by_desc(column),
            };
        }

        match (filter.limit, filter.skip) {
            (Some(limit), skip) => {
                query = query.limit(limit).offset(skip.unwrap_or(0));
            }
            (None, Some(skip)) => {
                query = query.limit(NO_LIMIT).offset(skip);
            }
            (None, None) => {}
        }

        Ok(query.all(&self.db).await?)
    }

    async fn find_by_id(&self, id: &String) -> Result<ModelOf<A>, DomainError> {
        EntityOf::<A>::find()
            .filter(self.id_condition(id)?)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found(self.schema.name, id.clone()))
    }

    async fn update_all(
        &self,
        record: Record,
        r#where: Option<&Where>,
    ) -> Result<Count, DomainError> {
        let condition = where_condition::<ColumnOf<A>>(self.schema, r#where)?;
        let count = self.update_matching(&record, condition).await?;
        tracing::debug!("Updated {} {} record(s)", count, self.schema.name);
        Ok(Count { count })
    }

    async fn update_by_id(&self, id: &String, record: Record) -> Result<(), DomainError> {
        let affected = self
            .update_matching(&record, self.id_condition(id)?)
            .await?;
        if affected == 0 {
            return Err(DomainError::not_found(self.schema.name, id.clone()));
        }
        Ok(())
    }

    async fn replace_by_id(&self, id: &String, record: Record) -> Result<(), DomainError> {
        // The record already carries every property, nulls included
        let affected = self
            .update_matching(&record, self.id_condition(id)?)
            .await?;
        if affected == 0 {
            return Err(DomainError::not_found(self.schema.name, id.clone()));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &String) -> Result<(), DomainError> {
        let result = EntityOf::<A>::delete_many()
            .filter(self.id_condition(id)?)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(self.schema.name, id.clone()));
        }

        tracing::debug!("Deleted {} {}", self.schema.name, id);
        Ok(())
    }

    async fn count(&self, r#where: Option<&Where>) -> Result<Count, DomainError> {
        let count = EntityOf::<A>::find()
            .filter(where_condition::<ColumnOf<A>>(self.schema, r#where)?)
            .count(&self.db)
            .await?;
        Ok(Count { count })
    }
}
