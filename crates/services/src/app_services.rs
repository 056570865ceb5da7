use std::sync::Arc;

use api::{ApiConfig, Backend, HttpApi, InMemoryApi};

use crate::course_service::CourseService;
use crate::dashboard_service::DashboardService;
use crate::preferences::{InMemoryPreferences, PreferencesService, PreferencesStore};
use crate::progress_service::ProgressService;
use crate::Clock;

/// Assembles the services a UI shell consumes, wired over one backend.
#[derive(Clone)]
pub struct AppServices {
    progress: ProgressService,
    courses: CourseService,
    dashboard: DashboardService,
    preferences: PreferencesService,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, backend: &Backend, preferences: Arc<dyn PreferencesStore>) -> Self {
        let progress = ProgressService::new(clock, Arc::clone(&backend.progress));
        let courses = CourseService::new(Arc::clone(&backend.catalog), progress.clone());
        let dashboard = DashboardService::new(Arc::clone(&backend.enrollments), courses.clone());
        let preferences = PreferencesService::new(preferences);

        Self {
            progress,
            courses,
            dashboard,
            preferences,
        }
    }

    /// Build services over the HTTP backend.
    #[must_use]
    pub fn over_http(clock: Clock, config: ApiConfig, preferences: Arc<dyn PreferencesStore>) -> Self {
        let http = HttpApi::new(config);
        let backend = Backend {
            catalog: Arc::new(http.clone()),
            progress: Arc::new(http.clone()),
            enrollments: Arc::new(http),
        };
        Self::new(clock, &backend, preferences)
    }

    /// Build services over in-memory backends, for tests and prototyping.
    #[must_use]
    pub fn in_memory(clock: Clock, apis: &InMemoryApi) -> Self {
        Self::new(
            clock,
            &Backend::from_in_memory(apis),
            Arc::new(InMemoryPreferences::new()),
        )
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    #[must_use]
    pub fn courses(&self) -> &CourseService {
        &self.courses
    }

    #[must_use]
    pub fn dashboard(&self) -> &DashboardService {
        &self.dashboard
    }

    #[must_use]
    pub fn preferences(&self) -> &PreferencesService {
        &self.preferences
    }
}
