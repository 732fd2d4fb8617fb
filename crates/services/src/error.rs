//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NavigationService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NavigationError {
    /// Navigation links only make sense on an activity page; callers
    /// without an activity context must not render them.
    #[error("activity context is not set for this page")]
    MissingActivityContext,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CompletionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompletionServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
