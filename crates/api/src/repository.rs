use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use jijue_core::model::{Course, CourseId, Enrollment, LessonId, LessonProgress, UserId};

/// Errors surfaced by backend API adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("network failure: {0}")]
    Network(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Drives the UI's retry affordance: transport failures and server
    /// errors are retryable, 4xx outcomes and malformed bodies are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Http(_) => true,
            Self::Status(status) => status.is_server_error(),
            Self::NotFound | Self::Unauthorized | Self::Decode(_) => false,
        }
    }
}

/// Course catalog reads.
///
/// Implementations return fully order-normalized course trees; callers can
/// rely on `modules()` and `lessons()` being in authored order.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch the whole course catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError>;

    /// Fetch one course with its modules and lessons.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the course does not exist.
    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError>;
}

/// Per-lesson progress reads and writes.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// Fetch one lesson's progress record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when the user has never viewed the
    /// lesson; callers normalize that to a not-started record.
    async fn get_lesson_progress(
        &self,
        user: UserId,
        lesson: LessonId,
    ) -> Result<LessonProgress, ApiError>;

    /// Idempotent upsert of one lesson's progress; echoes the stored record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures.
    async fn put_lesson_progress(
        &self,
        progress: &LessonProgress,
    ) -> Result<LessonProgress, ApiError>;
}

/// Course enrollment reads.
#[async_trait]
pub trait EnrollmentApi: Send + Sync {
    /// Fetch a user's enrollments in enrollment order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures.
    async fn list_enrollments(&self, user: UserId) -> Result<Vec<Enrollment>, ApiError>;
}

/// In-memory backend for tests and prototyping.
///
/// Mirrors the upsert/echo semantics of the real API and can inject read or
/// write failures to drive error-path and rollback tests.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    courses: Vec<Course>,
    enrollments: Vec<Enrollment>,
    progress: HashMap<(UserId, LessonId), LessonProgress>,
    fail_reads: bool,
    fail_writes: bool,
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course to the catalog, replacing any existing entry with the
    /// same id.
    pub fn insert_course(&self, course: Course) {
        let mut inner = self.inner.lock().expect("in-memory api lock");
        if let Some(existing) = inner.courses.iter_mut().find(|c| c.id() == course.id()) {
            *existing = course;
        } else {
            inner.courses.push(course);
        }
    }

    pub fn insert_enrollment(&self, enrollment: Enrollment) {
        let mut inner = self.inner.lock().expect("in-memory api lock");
        inner.enrollments.push(enrollment);
    }

    /// Seeds a progress record directly, bypassing the write path.
    pub fn seed_progress(&self, progress: LessonProgress) {
        let mut inner = self.inner.lock().expect("in-memory api lock");
        inner
            .progress
            .insert((progress.user_id(), progress.lesson_id()), progress);
    }

    /// Makes every subsequent read fail with `ApiError::Network`.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().expect("in-memory api lock").fail_reads = fail;
    }

    /// Makes every subsequent write fail with `ApiError::Network`.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().expect("in-memory api lock").fail_writes = fail;
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        self.inner
            .lock()
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for InMemoryApi {
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(ApiError::Network("injected read failure".into()));
        }
        Ok(inner.courses.clone())
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(ApiError::Network("injected read failure".into()));
        }
        inner
            .courses
            .iter()
            .find(|c| c.id() == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl ProgressApi for InMemoryApi {
    async fn get_lesson_progress(
        &self,
        user: UserId,
        lesson: LessonId,
    ) -> Result<LessonProgress, ApiError> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(ApiError::Network("injected read failure".into()));
        }
        inner
            .progress
            .get(&(user, lesson))
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn put_lesson_progress(
        &self,
        progress: &LessonProgress,
    ) -> Result<LessonProgress, ApiError> {
        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(ApiError::Network("injected write failure".into()));
        }
        inner.progress.insert(
            (progress.user_id(), progress.lesson_id()),
            progress.clone(),
        );
        Ok(progress.clone())
    }
}

#[async_trait]
impl EnrollmentApi for InMemoryApi {
    async fn list_enrollments(&self, user: UserId) -> Result<Vec<Enrollment>, ApiError> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(ApiError::Network("injected read failure".into()));
        }
        Ok(inner
            .enrollments
            .iter()
            .filter(|e| e.user_id == user)
            .copied()
            .collect())
    }
}

/// Aggregates the three API surfaces behind trait objects so services can
/// swap backends (HTTP vs in-memory) without caring which is wired.
#[derive(Clone)]
pub struct Backend {
    pub catalog: Arc<dyn CatalogApi>,
    pub progress: Arc<dyn ProgressApi>,
    pub enrollments: Arc<dyn EnrollmentApi>,
}

impl Backend {
    #[must_use]
    pub fn in_memory() -> Self {
        let api = InMemoryApi::new();
        Self::from_in_memory(&api)
    }

    #[must_use]
    pub fn from_in_memory(api: &InMemoryApi) -> Self {
        Self {
            catalog: Arc::new(api.clone()),
            progress: Arc::new(api.clone()),
            enrollments: Arc::new(api.clone()),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
