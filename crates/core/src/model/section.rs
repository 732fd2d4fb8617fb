use serde::{Deserialize, Serialize};

use crate::model::activity::Activity;
use crate::model::ids::ActivityId;

/// An ordered grouping of activities within a course ("Topic").
///
/// Ordinal 0 is the reserved general section; it is never a navigation
/// target and never appears on the course index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub ordinal: u32,
    /// Custom title, if the course author set one.
    pub title: Option<String>,
    /// Whether the section is visible in the course at all.
    pub visible: bool,
    /// Whether the current viewer can see it.
    pub user_visible: bool,
    /// Whether availability restrictions currently allow access.
    pub available: bool,
    /// Host-provided explanation shown when the section is restricted.
    pub availability_info: Option<String>,
    pub activities: Vec<Activity>,
}

impl Section {
    #[must_use]
    pub fn new(ordinal: u32, title: Option<String>) -> Self {
        Self {
            ordinal,
            title: normalize_optional(title),
            visible: true,
            user_visible: true,
            available: true,
            availability_info: None,
            activities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_activities(mut self, activities: Vec<Activity>) -> Self {
        self.activities = activities;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visible: bool, user_visible: bool) -> Self {
        self.visible = visible;
        self.user_visible = user_visible;
        self
    }

    #[must_use]
    pub fn with_availability(mut self, available: bool, info: Option<String>) -> Self {
        self.available = available;
        self.availability_info = normalize_optional(info);
        self
    }

    /// The custom title, or the host's default "Topic N" naming.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Topic {}", self.ordinal))
    }

    /// True for the reserved general section.
    #[must_use]
    pub fn is_general(&self) -> bool {
        self.ordinal == 0
    }

    /// Position of an activity in the raw, host-ordered list.
    #[must_use]
    pub fn activity_position(&self, id: ActivityId) -> Option<usize> {
        self.activities.iter().position(|a| a.id == id)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_topic_number() {
        let section = Section::new(3, None);
        assert_eq!(section.display_name(), "Topic 3");

        let named = Section::new(3, Some("Fractions".to_string()));
        assert_eq!(named.display_name(), "Fractions");
    }

    #[test]
    fn blank_title_is_dropped() {
        let section = Section::new(1, Some("   ".to_string()));
        assert_eq!(section.title, None);
    }

    #[test]
    fn activity_position_uses_host_order() {
        let a = Activity::new(ActivityId::new(10), "A", None).unwrap();
        let b = Activity::new(ActivityId::new(20), "B", None).unwrap();
        let section = Section::new(1, None).with_activities(vec![a, b]);

        assert_eq!(section.activity_position(ActivityId::new(20)), Some(1));
        assert_eq!(section.activity_position(ActivityId::new(99)), None);
    }
}
