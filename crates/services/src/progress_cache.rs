use std::collections::HashMap;

use topics_core::model::{CompletionIndex, Course, FormatSettings, Viewer};
use topics_core::progress::{CompletionStatus, SectionProgress};

/// Request-scoped memoization of per-section progress.
///
/// Each section's snapshot and aggregate status are computed on first access
/// and reused for the rest of the render pass. The cache is dropped with the
/// request; nothing is shared across requests.
pub struct ProgressCache<'c> {
    course: &'c Course,
    settings: FormatSettings,
    viewer: Viewer,
    snapshots: HashMap<u32, SectionProgress>,
    statuses: HashMap<u32, CompletionStatus>,
}

impl<'c> ProgressCache<'c> {
    #[must_use]
    pub fn new(course: &'c Course, settings: FormatSettings, viewer: Viewer) -> Self {
        Self {
            course,
            settings,
            viewer,
            snapshots: HashMap::new(),
            statuses: HashMap::new(),
        }
    }

    /// Snapshot for a section ordinal; `None` for unknown ordinals.
    pub fn progress(&mut self, ordinal: u32) -> Option<&SectionProgress> {
        if !self.snapshots.contains_key(&ordinal) {
            let section = self.course.section(ordinal)?;
            let snapshot = SectionProgress::build(section, &self.settings, &self.viewer);
            self.snapshots.insert(ordinal, snapshot);
        }
        self.snapshots.get(&ordinal)
    }

    /// Aggregate status for a section ordinal, memoized per ordinal.
    /// Unknown ordinals are reported incomplete.
    pub fn status(&mut self, ordinal: u32, completion: &CompletionIndex) -> CompletionStatus {
        if let Some(status) = self.statuses.get(&ordinal) {
            return *status;
        }
        let status = self
            .progress(ordinal)
            .map_or(CompletionStatus::Incomplete, |p| p.status(completion));
        self.statuses.insert(ordinal, status);
        status
    }
}
