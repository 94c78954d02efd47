use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{EntitySchema, Property, PropertyKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String, // UUID
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub static SCHEMA: EntitySchema = EntitySchema {
    name: "Book",
    id: "id",
    properties: &[
        Property::required("title", PropertyKind::String),
        Property::optional("author", PropertyKind::String),
        Property::optional("isbn", PropertyKind::String),
        Property::optional("summary", PropertyKind::String),
        Property::optional("publication_year", PropertyKind::Integer),
    ],
};
