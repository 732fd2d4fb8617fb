use chrono::{DateTime, Utc};
use sqlx::Row;

use topics_core::model::{ActivityId, CompletionIndex, CompletionState, CourseId};

use super::SqliteRepository;
use super::mapping::{
    activity_id_from_i64, completion_state_to_str, id_to_i64, parse_completion_state, ser,
};
use crate::repository::{CompletionRecord, CompletionRepository, StorageError};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl CompletionRepository for SqliteRepository {
    async fn completion_index(&self, course_id: CourseId) -> Result<CompletionIndex, StorageError> {
        let rows = sqlx::query(
            "SELECT activity_id, state FROM activity_completion WHERE course_id = ?1",
        )
        .bind(id_to_i64("course_id", course_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut index = CompletionIndex::new();
        for row in &rows {
            let activity_id = activity_id_from_i64(row.try_get("activity_id").map_err(ser)?)?;
            let state = parse_completion_state(&row.try_get::<String, _>("state").map_err(ser)?)?;
            index.insert(activity_id, state);
        }
        Ok(index)
    }

    async fn activity_state(
        &self,
        course_id: CourseId,
        activity_id: ActivityId,
    ) -> Result<Option<CompletionRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT state, updated_at FROM activity_completion
            WHERE course_id = ?1 AND activity_id = ?2
            ",
        )
        .bind(id_to_i64("course_id", course_id.value())?)
        .bind(id_to_i64("activity_id", activity_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.map(|row| {
            let state = parse_completion_state(&row.try_get::<String, _>("state").map_err(ser)?)?;
            let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(ser)?;
            Ok(CompletionRecord {
                activity_id,
                state,
                updated_at,
            })
        })
        .transpose()
    }

    async fn set_activity_state(
        &self,
        course_id: CourseId,
        activity_id: ActivityId,
        state: CompletionState,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO activity_completion (course_id, activity_id, state, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(course_id, activity_id) DO UPDATE SET
                state = excluded.state,
                updated_at = excluded.updated_at
            ",
        )
        .bind(id_to_i64("course_id", course_id.value())?)
        .bind(id_to_i64("activity_id", activity_id.value())?)
        .bind(completion_state_to_str(state))
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }
}
