use std::sync::Arc;

use tracing::debug;

use storage::repository::{CourseRepository, StorageError};
use topics_core::model::{ActivityId, CourseId, FormatSettings, Viewer};
use topics_core::navigation;

use super::links::NavigationLinks;
use crate::error::NavigationError;

/// Resolves the previous/next links shown at the bottom of an activity page.
#[derive(Clone)]
pub struct NavigationService {
    courses: Arc<dyn CourseRepository>,
}

impl NavigationService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Resolve both links relative to the current activity.
    ///
    /// `current` is the activity the page is rendering; passing `None`
    /// means the caller is not on an activity page at all, which is a
    /// precondition failure rather than an empty result.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::MissingActivityContext` without an
    /// activity context, or `NavigationError::Storage` if the course cannot
    /// be loaded.
    pub async fn links_for_activity(
        &self,
        course_id: CourseId,
        current: Option<ActivityId>,
        settings: &FormatSettings,
        viewer: &Viewer,
    ) -> Result<NavigationLinks, NavigationError> {
        let Some(current) = current else {
            return Err(NavigationError::MissingActivityContext);
        };

        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let result = navigation::resolve(&course, current, settings, viewer);
        debug!(
            course = %course_id,
            activity = %current,
            has_previous = result.previous.is_some(),
            has_next = result.next.is_some(),
            "resolved navigation links"
        );
        Ok(NavigationLinks::from_result(&course, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use topics_core::model::{Activity, Course, Section};
    use url::Url;

    fn activity(id: u64, name: &str) -> Activity {
        let url = Url::parse(&format!("https://lms.example.edu/mod/page/view.php?id={id}"))
            .unwrap();
        Activity::new(ActivityId::new(id), name, Some(url)).unwrap()
    }

    fn build_course() -> Course {
        Course::new(
            CourseId::new(5),
            "Algebra Basics",
            "ALG101",
            Url::parse("https://lms.example.edu/course/view.php?id=5").unwrap(),
            vec![
                Section::new(0, None),
                Section::new(1, None)
                    .with_activities(vec![activity(11, "Intro"), activity(12, "Quiz")]),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn missing_activity_context_is_a_precondition_failure() {
        let repo = InMemoryRepository::new();
        repo.upsert_course(&build_course()).await.unwrap();
        let service = NavigationService::new(Arc::new(repo));

        let err = service
            .links_for_activity(
                CourseId::new(5),
                None,
                &FormatSettings::default(),
                &Viewer::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, NavigationError::MissingActivityContext));
    }

    #[tokio::test]
    async fn resolves_links_with_labels() {
        let repo = InMemoryRepository::new();
        repo.upsert_course(&build_course()).await.unwrap();
        let service = NavigationService::new(Arc::new(repo));

        let links = service
            .links_for_activity(
                CourseId::new(5),
                Some(ActivityId::new(11)),
                &FormatSettings::default(),
                &Viewer::default(),
            )
            .await
            .unwrap();

        assert_eq!(links.previous.unwrap().label, "ALG101");
        assert_eq!(links.next.unwrap().label, "Quiz");
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        struct BrokenCourses;

        #[async_trait::async_trait]
        impl CourseRepository for BrokenCourses {
            async fn upsert_course(&self, _course: &Course) -> Result<(), StorageError> {
                Err(StorageError::Connection("down".into()))
            }

            async fn get_course(&self, _id: CourseId) -> Result<Option<Course>, StorageError> {
                Err(StorageError::Connection("down".into()))
            }
        }

        let service = NavigationService::new(Arc::new(BrokenCourses));
        let err = service
            .links_for_activity(
                CourseId::new(5),
                Some(ActivityId::new(11)),
                &FormatSettings::default(),
                &Viewer::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            NavigationError::Storage(StorageError::Connection(_))
        ));
    }
}
