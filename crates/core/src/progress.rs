//! Per-section progress: the eligible activity subset and its aggregate
//! completion status.

use crate::model::{Activity, CompletionIndex, FormatSettings, Section, Viewer};

/// Aggregate completion status of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Complete,
    Incomplete,
}

impl CompletionStatus {
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, CompletionStatus::Complete)
    }
}

/// Snapshot of one section's eligible activities for the current viewer.
///
/// Built once per section per render pass and queried afterwards; the
/// underlying section data is treated as immutable for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProgress {
    ordinal: u32,
    activities: Vec<Activity>,
}

impl SectionProgress {
    /// Filter the section's raw activity list down to the eligible subset.
    ///
    /// An activity qualifies when it has a destination URL and either the
    /// viewer can see it, or hidden activities are displayed greyed out and
    /// the viewer holds the hidden-content override. Host order is kept.
    #[must_use]
    pub fn build(section: &Section, settings: &FormatSettings, viewer: &Viewer) -> Self {
        let activities = section
            .activities
            .iter()
            .filter(|a| is_eligible(a, settings, viewer))
            .cloned()
            .collect();
        Self {
            ordinal: section.ordinal,
            activities,
        }
    }

    #[must_use]
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    #[must_use]
    pub fn first_activity(&self) -> Option<&Activity> {
        self.activities.first()
    }

    #[must_use]
    pub fn last_activity(&self) -> Option<&Activity> {
        self.activities.last()
    }

    /// Aggregate the section's completion status from the index.
    ///
    /// Sequential override over the eligible list: a tracked complete state
    /// latches Complete, but a tracked incomplete state ends the scan with
    /// Incomplete; later complete states must not override it. A section
    /// with no tracked activities is Incomplete.
    #[must_use]
    pub fn status(&self, completion: &CompletionIndex) -> CompletionStatus {
        let mut status = CompletionStatus::Incomplete;
        for activity in &self.activities {
            let Some(state) = completion.state(activity.id) else {
                continue;
            };
            if state.counts_as_complete() {
                status = CompletionStatus::Complete;
            } else {
                status = CompletionStatus::Incomplete;
                break;
            }
        }
        status
    }

    #[must_use]
    pub fn is_complete(&self, completion: &CompletionIndex) -> bool {
        self.status(completion).is_complete()
    }
}

fn is_eligible(activity: &Activity, settings: &FormatSettings, viewer: &Viewer) -> bool {
    if activity.url.is_none() {
        return false;
    }
    activity.user_visible || (settings.display_hidden_topics && viewer.can_view_hidden)
}
