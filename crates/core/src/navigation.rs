//! Previous/next destination resolution relative to one activity.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::{Activity, ActivityId, Course, FormatSettings, Viewer};
use crate::progress::SectionProgress;

/// A single previous/next target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    Activity {
        id: ActivityId,
        name: String,
        url: Url,
    },
    /// The course root page; only the backward scan falls back to it.
    CourseRoot,
}

impl Destination {
    fn for_activity(activity: &Activity) -> Option<Self> {
        let url = activity.url.clone()?;
        Some(Destination::Activity {
            id: activity.id,
            name: activity.name.clone(),
            url,
        })
    }
}

/// The resolved pair of navigation targets. Either side may be absent; the
/// caller simply omits that link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationResult {
    pub previous: Option<Destination>,
    pub next: Option<Destination>,
}

impl NavigationResult {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            previous: None,
            next: None,
        }
    }
}

/// Resolve the previous and next destinations for the given activity.
///
/// Both scans start from the activity's position in its section's raw,
/// host-ordered sibling list and test each candidate for navigability.
/// When a section runs out, the backward scan continues with the last
/// eligible activity of earlier sections and the forward scan with the
/// first eligible activity of later ones; the general section (ordinal 0)
/// is never considered. An exhausted backward scan falls back to the course
/// root; an exhausted forward scan yields nothing.
///
/// An activity that cannot be found in the course degrades to an empty
/// result rather than an error.
#[must_use]
pub fn resolve(
    course: &Course,
    current: ActivityId,
    settings: &FormatSettings,
    viewer: &Viewer,
) -> NavigationResult {
    let Some((section, position)) = course.locate_activity(current) else {
        return NavigationResult::empty();
    };

    let previous = section.activities[..position]
        .iter()
        .rev()
        .find(|a| a.is_navigable())
        .and_then(Destination::for_activity)
        .or_else(|| {
            last_in_earlier_sections(course, section.ordinal, settings, viewer)
                .as_ref()
                .and_then(Destination::for_activity)
        })
        .or(Some(Destination::CourseRoot));

    let next = section.activities[position + 1..]
        .iter()
        .find(|a| a.is_navigable())
        .and_then(Destination::for_activity)
        .or_else(|| {
            first_in_later_sections(course, section.ordinal, settings, viewer)
                .as_ref()
                .and_then(Destination::for_activity)
        });

    NavigationResult { previous, next }
}

fn last_in_earlier_sections(
    course: &Course,
    before: u32,
    settings: &FormatSettings,
    viewer: &Viewer,
) -> Option<Activity> {
    course
        .sections
        .iter()
        .rev()
        .filter(|s| s.ordinal > 0 && s.ordinal < before)
        .find_map(|s| {
            SectionProgress::build(s, settings, viewer)
                .last_activity()
                .cloned()
        })
}

fn first_in_later_sections(
    course: &Course,
    after: u32,
    settings: &FormatSettings,
    viewer: &Viewer,
) -> Option<Activity> {
    course
        .sections
        .iter()
        .filter(|s| s.ordinal > 0 && s.ordinal > after)
        .find_map(|s| {
            SectionProgress::build(s, settings, viewer)
                .first_activity()
                .cloned()
        })
}
