#![forbid(unsafe_code)]

pub mod app_services;
pub mod course_service;
pub mod dashboard_service;
pub mod error;
pub mod preferences;
pub mod progress_editor;
pub mod progress_service;
pub mod view_state;

pub use jijue_core::Clock;

pub use app_services::AppServices;
pub use course_service::{CourseOverview, CourseService, ModuleOverview};
pub use dashboard_service::{ContinuePrompt, CourseCard, DashboardService, DashboardSummary};
pub use error::{
    CourseServiceError, DashboardError, PreferencesServiceError, ProgressServiceError,
};
pub use preferences::{
    InMemoryPreferences, PreferenceStoreError, PreferencesService, PreferencesStore,
};
pub use progress_editor::LessonProgressEditor;
pub use progress_service::ProgressService;
pub use view_state::{RequestToken, SectionState, TrackedSection};
