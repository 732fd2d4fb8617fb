use url::Url;

use topics_core::model::{ActivityId, CompletionState, CourseId};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn course_id_from_i64(v: i64) -> Result<CourseId, StorageError> {
    Ok(CourseId::new(i64_to_u64("course_id", v)?))
}

pub(crate) fn activity_id_from_i64(v: i64) -> Result<ActivityId, StorageError> {
    Ok(ActivityId::new(i64_to_u64("activity_id", v)?))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn ordinal_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization("ordinal out of range".into()))
}

pub(crate) fn parse_completion_state(s: &str) -> Result<CompletionState, StorageError> {
    match s {
        "incomplete" => Ok(CompletionState::Incomplete),
        "complete" => Ok(CompletionState::Complete),
        "complete_pass" => Ok(CompletionState::CompletePass),
        "complete_fail" => Ok(CompletionState::CompleteFail),
        _ => Err(StorageError::Serialization(format!(
            "invalid completion state: {s}"
        ))),
    }
}

pub(crate) fn completion_state_to_str(state: CompletionState) -> &'static str {
    match state {
        CompletionState::Incomplete => "incomplete",
        CompletionState::Complete => "complete",
        CompletionState::CompletePass => "complete_pass",
        CompletionState::CompleteFail => "complete_fail",
    }
}

pub(crate) fn parse_optional_url(raw: Option<String>) -> Result<Option<Url>, StorageError> {
    raw.map(|s| Url::parse(&s).map_err(ser)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_state_roundtrip() {
        for state in [
            CompletionState::Incomplete,
            CompletionState::Complete,
            CompletionState::CompletePass,
            CompletionState::CompleteFail,
        ] {
            assert_eq!(
                parse_completion_state(completion_state_to_str(state)).unwrap(),
                state
            );
        }
        assert!(parse_completion_state("finished").is_err());
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!(course_id_from_i64(-1).is_err());
        assert!(activity_id_from_i64(i64::MIN).is_err());
    }
}
