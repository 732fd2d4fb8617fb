mod activity;
mod completion;
mod course;
mod ids;
mod section;
mod settings;

pub use activity::{Activity, ActivityError};
pub use completion::{CompletionIndex, CompletionState};
pub use course::{Course, CourseError};
pub use ids::{ActivityId, CourseId, ParseIdError};
pub use section::Section;
pub use settings::{CourseDisplay, FormatSettings, HiddenSections, Viewer};
