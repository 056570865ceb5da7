mod catalog;
mod enrollment;
mod ids;
mod preferences;
mod progress;

pub use ids::{CourseId, LessonId, ModuleId, ParseIdError, UserId};

pub use catalog::{CatalogError, Course, CourseAccent, CourseIcon, Lesson, Module};
pub use enrollment::Enrollment;
pub use preferences::{NotificationChannels, PreferencesError, Theme, UiPreferences};
pub use progress::{LessonProgress, LessonStatus, ProgressError};
