#![forbid(unsafe_code)]

pub mod completion_service;
pub mod course_service;
pub mod error;
pub mod navigation;
pub mod progress_cache;

pub use topics_core::Clock;

pub use completion_service::CompletionService;
pub use course_service::{CourseService, SectionSummaryItem};
pub use error::{CompletionServiceError, CourseServiceError, NavigationError};
pub use navigation::{NavigationLink, NavigationLinks, NavigationService};
pub use progress_cache::ProgressCache;
