//! Feedback repository bound to the `feedbacks` table

use sea_orm::DatabaseConnection;

use super::SeaOrmCrudRepository;
use crate::models::feedback;

pub type SeaOrmFeedbackRepository = SeaOrmCrudRepository<feedback::ActiveModel>;

impl SeaOrmFeedbackRepository {
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self::new(db, &feedback::SCHEMA)
    }
}
