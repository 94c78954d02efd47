//! Book repository bound to the `books` table

use sea_orm::DatabaseConnection;

use super::SeaOrmCrudRepository;
use crate::models::book;

pub type SeaOrmBookRepository = SeaOrmCrudRepository<book::ActiveModel>;

impl SeaOrmBookRepository {
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self::new(db, &book::SCHEMA)
    }
}
