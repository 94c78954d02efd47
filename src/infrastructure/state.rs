//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::CrudRepository;
use crate::infrastructure::{SeaOrmBookRepository, SeaOrmFeedbackRepository};
use crate::models::{Book, Feedback};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Book repository (no HTTP surface yet)
    pub book_repo: Arc<dyn CrudRepository<Book, String>>,
    /// Feedback repository
    pub feedback_repo: Arc<dyn CrudRepository<Feedback, String>>,
}

impl AppState {
    /// Create a new AppState with all repositories bound to one connection
    pub fn new(db: DatabaseConnection) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::from_connection(db.clone()));
        let feedback_repo = Arc::new(SeaOrmFeedbackRepository::from_connection(db));

        Self {
            book_repo,
            feedback_repo,
        }
    }
}
