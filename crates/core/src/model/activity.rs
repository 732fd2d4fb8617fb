use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::ActivityId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("activity name cannot be empty")]
    EmptyName,
}

/// A single learning item inside a course section, as materialized by the
/// host structure provider. The core never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    /// Destination of the activity's own page. Inline modules (labels and
    /// the like) have none and never take part in navigation or progress.
    pub url: Option<Url>,
    /// Whether the current viewer can see the activity at all.
    pub user_visible: bool,
    /// Whether availability restrictions currently allow access.
    pub available: bool,
    /// Whether the host monitors completion for this module.
    pub completion_tracked: bool,
}

impl Activity {
    /// Create an activity that is visible, available, and untracked.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::EmptyName` if the name is blank.
    pub fn new(
        id: ActivityId,
        name: impl Into<String>,
        url: Option<Url>,
    ) -> Result<Self, ActivityError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ActivityError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            url,
            user_visible: true,
            available: true,
            completion_tracked: false,
        })
    }

    #[must_use]
    pub fn with_visibility(mut self, user_visible: bool) -> Self {
        self.user_visible = user_visible;
        self
    }

    #[must_use]
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    #[must_use]
    pub fn with_completion_tracking(mut self, tracked: bool) -> Self {
        self.completion_tracked = tracked;
        self
    }

    /// True when the activity can serve as a previous/next destination for
    /// the current viewer: it has its own page and the viewer can see it.
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        self.url.is_some() && self.user_visible
    }
}
