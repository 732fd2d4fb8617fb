use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use url::Url;

use storage::repository::{CompletionRepository, CourseRepository, StorageError};
use topics_core::model::{
    CompletionIndex, Course, CourseId, FormatSettings, HiddenSections, Viewer,
};

use crate::error::CourseServiceError;
use crate::progress_cache::ProgressCache;

/// Presentation-agnostic line item for the course index page.
///
/// No markup and no localized strings: the renderer decides how each flag
/// is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummaryItem {
    pub ordinal: u32,
    pub title: String,
    pub completed: bool,
    /// Hidden from students; rendered dimmed.
    pub hidden: bool,
    /// The section the course currently highlights.
    pub current: bool,
    /// Inaccessible to this viewer but shown greyed out by the
    /// display-hidden-topics override.
    pub locked: bool,
    /// Whether the title links anywhere for this viewer.
    pub linkable: bool,
    pub view_url: Url,
}

/// Orchestrates course structure and completion lookups for one render pass.
#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    completion: Arc<dyn CompletionRepository>,
}

impl CourseService {
    #[must_use]
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        completion: Arc<dyn CompletionRepository>,
    ) -> Self {
        Self {
            courses,
            completion,
        }
    }

    /// Fetch the immutable course snapshot for a request.
    ///
    /// Returns `Ok(None)` when the course does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn get_course(&self, id: CourseId) -> Result<Option<Course>, CourseServiceError> {
        let course = self.courses.get_course(id).await?;
        Ok(course)
    }

    /// Completion index for a course. Fetching is idempotent; callers may
    /// re-fetch within a request without observing different data.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn completion_index(
        &self,
        id: CourseId,
    ) -> Result<CompletionIndex, CourseServiceError> {
        let index = self.completion.completion_index(id).await?;
        Ok(index)
    }

    /// The view URL for one section of a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the course is missing or
    /// repository access fails.
    pub async fn section_view_url(
        &self,
        course_id: CourseId,
        ordinal: u32,
    ) -> Result<Url, CourseServiceError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        Ok(section_view_url(&course, ordinal))
    }

    /// Build the course index: one summary per listed section.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the course is missing or
    /// repository access fails.
    pub async fn section_summaries(
        &self,
        course_id: CourseId,
        settings: &FormatSettings,
        viewer: &Viewer,
    ) -> Result<Vec<SectionSummaryItem>, CourseServiceError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        let completion = self.completion.completion_index(course_id).await?;
        let items = build_section_summaries(&course, &completion, settings, viewer);
        debug!(course = %course_id, listed = items.len(), "assembled course index");
        Ok(items)
    }
}

/// URL a section link points at: the section's first available activity,
/// falling back to the course root page.
#[must_use]
pub fn section_view_url(course: &Course, ordinal: u32) -> Url {
    course
        .section(ordinal)
        .and_then(|section| section.activities.iter().find(|a| a.available))
        .and_then(|activity| activity.url.clone())
        .unwrap_or_else(|| course.url.clone())
}

fn build_section_summaries(
    course: &Course,
    completion: &CompletionIndex,
    settings: &FormatSettings,
    viewer: &Viewer,
) -> Vec<SectionSummaryItem> {
    let mut cache = ProgressCache::new(course, *settings, *viewer);
    let mut items = Vec::new();

    for section in &course.sections {
        if section.is_general() {
            continue;
        }

        // A section is listed when the viewer can access it, when it is
        // restricted but carries an explanation, or when course/format
        // policy keeps hidden sections on the page.
        let shown = section.user_visible
            || (section.visible && !section.available && section.availability_info.is_some())
            || (!section.visible && settings.hidden_sections == HiddenSections::Collapsed);
        if !shown && !settings.display_hidden_topics {
            continue;
        }

        // Sections with nothing eligible to visit are not listed.
        if cache
            .progress(section.ordinal)
            .map_or(true, |p| p.is_empty())
        {
            continue;
        }

        let completed = cache.status(section.ordinal, completion).is_complete();
        items.push(SectionSummaryItem {
            ordinal: section.ordinal,
            title: section.display_name(),
            completed,
            hidden: !section.visible,
            current: course.is_current(section),
            locked: !section.user_visible && settings.display_hidden_topics,
            linkable: section.user_visible || settings.display_hidden_topics,
            view_url: section_view_url(course, section.ordinal),
        });
    }

    items
}
