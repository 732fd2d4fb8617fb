use thiserror::Error;

use crate::model::{ActivityError, CourseError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Activity(#[from] ActivityError),
    #[error(transparent)]
    Course(#[from] CourseError),
}
