pub mod book;
pub mod feedback;

pub use book::Model as Book;
pub use feedback::Model as Feedback;
