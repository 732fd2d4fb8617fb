use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use topics_core::model::{ActivityId, CompletionIndex, CompletionState, Course, CourseId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of one activity completion entry.
///
/// Presence of a record means the activity is tracked; the core's
/// `CompletionIndex` is assembled from these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub activity_id: ActivityId,
    pub state: CompletionState,
    pub updated_at: DateTime<Utc>,
}

/// Contract for the course structure provider.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist or replace a course snapshot, sections and activities included.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course by ID. Re-fetching within a request is idempotent.
    ///
    /// Returns `Ok(None)` when the course does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError>;
}

/// Contract for the completion provider.
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Assemble the completion index for one course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn completion_index(&self, course_id: CourseId) -> Result<CompletionIndex, StorageError>;

    /// Per-activity lookup. `Ok(None)` means the activity is not tracked.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn activity_state(
        &self,
        course_id: CourseId,
        activity_id: ActivityId,
    ) -> Result<Option<CompletionRecord>, StorageError>;

    /// Record or replace the completion state of one activity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn set_activity_state(
        &self,
        course_id: CourseId,
        activity_id: ActivityId,
        state: CompletionState,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    completion: Arc<Mutex<HashMap<(CourseId, ActivityId), CompletionRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(course.id, course.clone());
        Ok(())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }
}

#[async_trait]
impl CompletionRepository for InMemoryRepository {
    async fn completion_index(&self, course_id: CourseId) -> Result<CompletionIndex, StorageError> {
        let guard = self
            .completion
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|((course, _), _)| *course == course_id)
            .map(|((_, activity), record)| (*activity, record.state))
            .collect())
    }

    async fn activity_state(
        &self,
        course_id: CourseId,
        activity_id: ActivityId,
    ) -> Result<Option<CompletionRecord>, StorageError> {
        let guard = self
            .completion
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(course_id, activity_id)).cloned())
    }

    async fn set_activity_state(
        &self,
        course_id: CourseId,
        activity_id: ActivityId,
        state: CompletionState,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .completion
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            (course_id, activity_id),
            CompletionRecord {
                activity_id,
                state,
                updated_at,
            },
        );
        Ok(())
    }
}

/// Aggregates the provider contracts behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub completion: Arc<dyn CompletionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let completion: Arc<dyn CompletionRepository> = Arc::new(repo);
        Self {
            courses,
            completion,
        }
    }
}
