use serde::Serialize;
use url::Url;

use topics_core::model::Course;
use topics_core::navigation::{Destination, NavigationResult};

/// A renderable previous/next link: destination URL plus label text.
/// Plain data only; the markup around it is the host's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLink {
    pub url: Url,
    pub label: String,
}

/// The pair handed back to the renderer. An absent side means that link is
/// simply not shown; that is the normal end-of-course condition, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLinks {
    pub previous: Option<NavigationLink>,
    pub next: Option<NavigationLink>,
}

impl NavigationLinks {
    /// Resolve destinations into links. An activity labels itself with its
    /// name; the course root with the course short name.
    #[must_use]
    pub fn from_result(course: &Course, result: NavigationResult) -> Self {
        Self {
            previous: result.previous.map(|d| link_for(course, d)),
            next: result.next.map(|d| link_for(course, d)),
        }
    }
}

fn link_for(course: &Course, destination: Destination) -> NavigationLink {
    match destination {
        Destination::Activity { name, url, .. } => NavigationLink { url, label: name },
        Destination::CourseRoot => NavigationLink {
            url: course.url.clone(),
            label: course.short_name.clone(),
        },
    }
}
