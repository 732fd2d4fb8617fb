use std::sync::Arc;

use tracing::debug;

use storage::repository::CompletionRepository;
use topics_core::Clock;
use topics_core::model::{ActivityId, CompletionState, CourseId};

use crate::error::CompletionServiceError;

/// Records completion states on behalf of the host's tracking subsystem.
#[derive(Clone)]
pub struct CompletionService {
    clock: Clock,
    completion: Arc<dyn CompletionRepository>,
}

impl CompletionService {
    #[must_use]
    pub fn new(clock: Clock, completion: Arc<dyn CompletionRepository>) -> Self {
        Self { clock, completion }
    }

    /// Record a completion state, stamped with the service clock.
    ///
    /// # Errors
    ///
    /// Returns `CompletionServiceError::Storage` if persistence fails.
    pub async fn mark(
        &self,
        course_id: CourseId,
        activity_id: ActivityId,
        state: CompletionState,
    ) -> Result<(), CompletionServiceError> {
        self.completion
            .set_activity_state(course_id, activity_id, state, self.clock.now())
            .await?;
        debug!(course = %course_id, activity = %activity_id, ?state, "recorded completion state");
        Ok(())
    }

    /// Current state of one activity. `Ok(None)` means it is not tracked.
    ///
    /// # Errors
    ///
    /// Returns `CompletionServiceError::Storage` if repository access fails.
    pub async fn state(
        &self,
        course_id: CourseId,
        activity_id: ActivityId,
    ) -> Result<Option<CompletionState>, CompletionServiceError> {
        let record = self.completion.activity_state(course_id, activity_id).await?;
        Ok(record.map(|r| r.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::{CompletionRepository, InMemoryRepository};
    use topics_core::time::{fixed_clock, fixed_now};

    #[tokio::test]
    async fn mark_stamps_with_the_service_clock() {
        let repo = InMemoryRepository::new();
        let service = CompletionService::new(fixed_clock(), Arc::new(repo.clone()));

        service
            .mark(
                CourseId::new(5),
                ActivityId::new(11),
                CompletionState::CompletePass,
            )
            .await
            .unwrap();

        let record = repo
            .activity_state(CourseId::new(5), ActivityId::new(11))
            .await
            .unwrap()
            .expect("tracked");
        assert_eq!(record.state, CompletionState::CompletePass);
        assert_eq!(record.updated_at, fixed_now());

        let state = service
            .state(CourseId::new(5), ActivityId::new(11))
            .await
            .unwrap();
        assert_eq!(state, Some(CompletionState::CompletePass));

        let untracked = service
            .state(CourseId::new(5), ActivityId::new(12))
            .await
            .unwrap();
        assert_eq!(untracked, None);
    }
}
