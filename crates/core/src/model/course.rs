use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::activity::Activity;
use crate::model::ids::{ActivityId, CourseId};
use crate::model::section::Section;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course name cannot be empty")]
    EmptyName,

    #[error("section ordinals must be strictly ascending ({found} follows {previous})")]
    UnorderedSections { previous: u32, found: u32 },
}

/// An immutable snapshot of one course's structure, as handed over by the
/// host for the duration of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub full_name: String,
    pub short_name: String,
    /// The course root page. Backward navigation falls back to it when no
    /// earlier activity exists.
    pub url: Url,
    /// Ordinal of the section highlighted as current, if any.
    pub marker: Option<u32>,
    pub sections: Vec<Section>,
}

impl Course {
    /// Build a course snapshot, checking the section ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyName` if either name is blank, or
    /// `CourseError::UnorderedSections` if section ordinals are not strictly
    /// ascending.
    pub fn new(
        id: CourseId,
        full_name: impl Into<String>,
        short_name: impl Into<String>,
        url: Url,
        sections: Vec<Section>,
    ) -> Result<Self, CourseError> {
        let full_name = full_name.into();
        let short_name = short_name.into();
        if full_name.trim().is_empty() || short_name.trim().is_empty() {
            return Err(CourseError::EmptyName);
        }
        for pair in sections.windows(2) {
            if pair[1].ordinal <= pair[0].ordinal {
                return Err(CourseError::UnorderedSections {
                    previous: pair[0].ordinal,
                    found: pair[1].ordinal,
                });
            }
        }
        Ok(Self {
            id,
            full_name,
            short_name,
            url,
            marker: None,
            sections,
        })
    }

    #[must_use]
    pub fn with_marker(mut self, marker: Option<u32>) -> Self {
        self.marker = marker;
        self
    }

    #[must_use]
    pub fn section(&self, ordinal: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.ordinal == ordinal)
    }

    /// True when the section is the one flagged as current by the course.
    #[must_use]
    pub fn is_current(&self, section: &Section) -> bool {
        self.marker == Some(section.ordinal)
    }

    /// Find an activity and its position in the raw order of its section.
    #[must_use]
    pub fn locate_activity(&self, id: ActivityId) -> Option<(&Section, usize)> {
        self.sections
            .iter()
            .find_map(|s| s.activity_position(id).map(|pos| (s, pos)))
    }

    #[must_use]
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.locate_activity(id)
            .map(|(section, pos)| &section.activities[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_url() -> Url {
        Url::parse("https://lms.example.edu/course/view.php?id=5").unwrap()
    }

    #[test]
    fn rejects_unordered_sections() {
        let sections = vec![Section::new(0, None), Section::new(2, None), Section::new(1, None)];
        let err = Course::new(CourseId::new(5), "Algebra", "ALG", course_url(), sections)
            .unwrap_err();
        assert!(matches!(
            err,
            CourseError::UnorderedSections {
                previous: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn rejects_duplicate_ordinals() {
        let sections = vec![Section::new(1, None), Section::new(1, None)];
        let err = Course::new(CourseId::new(5), "Algebra", "ALG", course_url(), sections)
            .unwrap_err();
        assert!(matches!(err, CourseError::UnorderedSections { .. }));
    }

    #[test]
    fn locates_activity_in_its_section() {
        let activity = Activity::new(ActivityId::new(7), "Intro", None).unwrap();
        let sections = vec![
            Section::new(0, None),
            Section::new(1, None).with_activities(vec![activity]),
        ];
        let course =
            Course::new(CourseId::new(5), "Algebra", "ALG", course_url(), sections).unwrap();

        let (section, pos) = course.locate_activity(ActivityId::new(7)).unwrap();
        assert_eq!(section.ordinal, 1);
        assert_eq!(pos, 0);
        assert!(course.locate_activity(ActivityId::new(8)).is_none());
    }
}
