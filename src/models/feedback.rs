use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{EntitySchema, Property, PropertyKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "feedbacks")]
#[schema(as = Feedback)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String, // UUID
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
}

// No relations are declared for feedback
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub static SCHEMA: EntitySchema = EntitySchema {
    name: "Feedback",
    id: "id",
    properties: &[
        Property::required("comment", PropertyKind::String),
        Property::optional("name", PropertyKind::String),
        Property::optional("email", PropertyKind::String),
        Property::optional("rating", PropertyKind::Integer),
    ],
};
