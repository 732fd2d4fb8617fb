use serde::{Deserialize, Serialize};

/// How hidden sections appear to students, per the course option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenSections {
    /// Shown in collapsed form, marked as not available.
    #[default]
    Collapsed,
    /// Completely invisible to students.
    Invisible,
}

/// Whether the course shows everything on one page or one section per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseDisplay {
    SinglePage,
    /// This format defaults to one section per page.
    #[default]
    MultiPage,
}

/// Format configuration, threaded explicitly into every progress and
/// navigation call; the core never reads ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormatSettings {
    /// The admin checkbox: display inaccessible topics greyed out instead of
    /// hiding them from view.
    pub display_hidden_topics: bool,
    pub hidden_sections: HiddenSections,
    pub course_display: CourseDisplay,
}

/// The host's answer to the capability check for the current viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewer {
    /// Holds the override capability to view hidden content.
    pub can_view_hidden: bool,
}

impl Viewer {
    #[must_use]
    pub fn with_hidden_override() -> Self {
        Self {
            can_view_hidden: true,
        }
    }
}
