//! Repository implementations using SeaORM

pub mod book_repository;
pub mod condition;
pub mod crud_repository;
pub mod feedback_repository;

pub use book_repository::SeaOrmBookRepository;
pub use crud_repository::SeaOrmCrudRepository;
pub use feedback_repository::SeaOrmFeedbackRepository;
