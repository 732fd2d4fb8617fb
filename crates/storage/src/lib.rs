#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    CompletionRecord, CompletionRepository, CourseRepository, InMemoryRepository, Storage,
    StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
