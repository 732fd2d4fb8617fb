use std::collections::HashMap;

use sqlx::Row;
use tracing::debug;
use url::Url;

use topics_core::model::{Activity, Course, CourseId, Section};

use super::SqliteRepository;
use super::mapping::{activity_id_from_i64, id_to_i64, ordinal_from_i64, parse_optional_url, ser};
use crate::repository::{CourseRepository, StorageError};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let course_id = id_to_i64("course_id", course.id.value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        // Structure rows are replaced wholesale; completion rows are keyed
        // by course and survive the refresh.
        sqlx::query("DELETE FROM sections WHERE course_id = ?1")
            .bind(course_id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        sqlx::query("DELETE FROM activities WHERE course_id = ?1")
            .bind(course_id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO courses (id, full_name, short_name, url, marker)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                full_name = excluded.full_name,
                short_name = excluded.short_name,
                url = excluded.url,
                marker = excluded.marker
            ",
        )
        .bind(course_id)
        .bind(&course.full_name)
        .bind(&course.short_name)
        .bind(course.url.as_str())
        .bind(course.marker.map(i64::from))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        for section in &course.sections {
            sqlx::query(
                r"
                INSERT INTO sections
                    (course_id, ordinal, title, visible, user_visible, available, availability_info)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )
            .bind(course_id)
            .bind(i64::from(section.ordinal))
            .bind(section.title.as_deref())
            .bind(i64::from(section.visible))
            .bind(i64::from(section.user_visible))
            .bind(i64::from(section.available))
            .bind(section.availability_info.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

            for (position, activity) in section.activities.iter().enumerate() {
                let position = i64::try_from(position)
                    .map_err(|_| StorageError::Serialization("position overflow".into()))?;
                sqlx::query(
                    r"
                    INSERT INTO activities
                        (id, course_id, section_ordinal, position, name, url,
                         user_visible, available, completion_tracked)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ",
                )
                .bind(id_to_i64("activity_id", activity.id.value())?)
                .bind(course_id)
                .bind(i64::from(section.ordinal))
                .bind(position)
                .bind(&activity.name)
                .bind(activity.url.as_ref().map(Url::as_str))
                .bind(i64::from(activity.user_visible))
                .bind(i64::from(activity.available))
                .bind(i64::from(activity.completion_tracked))
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            }
        }

        tx.commit().await.map_err(conn)?;
        debug!(course = %course.id, sections = course.sections.len(), "stored course structure");
        Ok(())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let course_id = id_to_i64("course_id", id.value())?;

        let Some(row) = sqlx::query(
            "SELECT full_name, short_name, url, marker FROM courses WHERE id = ?1",
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        else {
            return Ok(None);
        };

        let full_name: String = row.try_get("full_name").map_err(ser)?;
        let short_name: String = row.try_get("short_name").map_err(ser)?;
        let url_raw: String = row.try_get("url").map_err(ser)?;
        let url = Url::parse(&url_raw).map_err(ser)?;
        let marker = row
            .try_get::<Option<i64>, _>("marker")
            .map_err(ser)?
            .map(ordinal_from_i64)
            .transpose()?;

        let activity_rows = sqlx::query(
            r"
            SELECT id, section_ordinal, name, url, user_visible, available, completion_tracked
            FROM activities
            WHERE course_id = ?1
            ORDER BY section_ordinal, position
            ",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut by_section: HashMap<u32, Vec<Activity>> = HashMap::new();
        for row in &activity_rows {
            let ordinal = ordinal_from_i64(row.try_get("section_ordinal").map_err(ser)?)?;
            let activity = Activity::new(
                activity_id_from_i64(row.try_get("id").map_err(ser)?)?,
                row.try_get::<String, _>("name").map_err(ser)?,
                parse_optional_url(row.try_get("url").map_err(ser)?)?,
            )
            .map_err(ser)?
            .with_visibility(row.try_get::<i64, _>("user_visible").map_err(ser)? != 0)
            .with_availability(row.try_get::<i64, _>("available").map_err(ser)? != 0)
            .with_completion_tracking(
                row.try_get::<i64, _>("completion_tracked").map_err(ser)? != 0,
            );
            by_section.entry(ordinal).or_default().push(activity);
        }

        let section_rows = sqlx::query(
            r"
            SELECT ordinal, title, visible, user_visible, available, availability_info
            FROM sections
            WHERE course_id = ?1
            ORDER BY ordinal
            ",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut sections = Vec::with_capacity(section_rows.len());
        for row in &section_rows {
            let ordinal = ordinal_from_i64(row.try_get("ordinal").map_err(ser)?)?;
            let section = Section::new(ordinal, row.try_get("title").map_err(ser)?)
                .with_visibility(
                    row.try_get::<i64, _>("visible").map_err(ser)? != 0,
                    row.try_get::<i64, _>("user_visible").map_err(ser)? != 0,
                )
                .with_availability(
                    row.try_get::<i64, _>("available").map_err(ser)? != 0,
                    row.try_get("availability_info").map_err(ser)?,
                )
                .with_activities(by_section.remove(&ordinal).unwrap_or_default());
            sections.push(section);
        }

        let course = Course::new(id, full_name, short_name, url, sections)
            .map_err(ser)?
            .with_marker(marker);
        Ok(Some(course))
    }
}
