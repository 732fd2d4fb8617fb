use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::ActivityId;

/// Raw per-activity completion state as recorded by the host's completion
/// tracking subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    Incomplete,
    Complete,
    CompletePass,
    CompleteFail,
}

impl CompletionState {
    /// Whether the state counts as complete for section aggregation.
    /// A failed completion does not.
    #[must_use]
    pub fn counts_as_complete(self) -> bool {
        matches!(self, CompletionState::Complete | CompletionState::CompletePass)
    }
}

/// Completion states for one course, keyed by activity.
///
/// Absence of a key means the activity is not tracked; lookups on missing
/// keys are never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionIndex {
    states: HashMap<ActivityId, CompletionState>,
}

impl CompletionIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ActivityId, state: CompletionState) {
        self.states.insert(id, state);
    }

    #[must_use]
    pub fn state(&self, id: ActivityId) -> Option<CompletionState> {
        self.states.get(&id).copied()
    }

    #[must_use]
    pub fn is_tracked(&self, id: ActivityId) -> bool {
        self.states.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<(ActivityId, CompletionState)> for CompletionIndex {
    fn from_iter<T: IntoIterator<Item = (ActivityId, CompletionState)>>(iter: T) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}
