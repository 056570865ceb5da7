//! Backend JSON shapes and their normalization into domain types.
//!
//! Everything string-ish the backend sends (status vocabulary, icon and
//! color names, unordered children with `order` fields) is converted here,
//! once, so the rest of the client only sees validated domain values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use jijue_core::model::{
    Course, CourseAccent, CourseIcon, CourseId, Enrollment, Lesson, LessonId, LessonProgress,
    LessonStatus, Module, ModuleId, UserId,
};

use crate::repository::ApiError;

#[derive(Debug, Deserialize)]
pub(crate) struct CourseDto {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleDto {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub lessons: Vec<LessonDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonDto {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub duration_minutes: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonProgressDto {
    pub status: LessonStatus,
    pub progress_percentage: u8,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of a progress upsert. Only status and percentage travel up; the
/// backend owns the lifecycle timestamps it returns.
#[derive(Debug, Serialize)]
pub(crate) struct SetProgressDto {
    pub status: LessonStatus,
    pub progress_percentage: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentDto {
    pub course_id: u64,
    pub enrolled_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CourseDto {
    pub(crate) fn into_domain(self) -> Result<Course, ApiError> {
        let course_id = CourseId::new(self.id);

        let icon = match self.icon.as_deref() {
            None => CourseIcon::default(),
            Some(name) => CourseIcon::from_name(name).unwrap_or_else(|| {
                warn!(icon = name, course = %course_id, "unknown course icon, using default");
                CourseIcon::default()
            }),
        };
        let accent = match self.color.as_deref() {
            None => CourseAccent::default(),
            Some(name) => CourseAccent::from_name(name).unwrap_or_else(|| {
                warn!(color = name, course = %course_id, "unknown accent color, using default");
                CourseAccent::default()
            }),
        };

        let mut modules = self.modules;
        modules.sort_by_key(|m| m.order);
        let modules = modules
            .into_iter()
            .map(|m| m.into_domain(course_id))
            .collect::<Result<Vec<_>, _>>()?;

        Course::new(
            course_id,
            self.title,
            self.description,
            self.category,
            icon,
            accent,
            modules,
        )
        .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl ModuleDto {
    fn into_domain(self, course_id: CourseId) -> Result<Module, ApiError> {
        let module_id = ModuleId::new(self.id);

        let mut lessons = self.lessons;
        lessons.sort_by_key(|l| l.order);
        let lessons = lessons
            .into_iter()
            .map(|l| l.into_domain(module_id))
            .collect::<Result<Vec<_>, _>>()?;

        Module::new(module_id, course_id, self.title, self.description, lessons)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl LessonDto {
    fn into_domain(self, module_id: ModuleId) -> Result<Lesson, ApiError> {
        Lesson::new(
            LessonId::new(self.id),
            module_id,
            self.title,
            self.description,
            self.duration_minutes,
        )
        .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl LessonProgressDto {
    pub(crate) fn into_domain(
        self,
        user: UserId,
        lesson: LessonId,
    ) -> Result<LessonProgress, ApiError> {
        LessonProgress::from_persisted(
            user,
            lesson,
            self.status,
            self.progress_percentage,
            self.started_at,
            self.completed_at,
            self.updated_at,
        )
        .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl SetProgressDto {
    pub(crate) fn from_domain(progress: &LessonProgress) -> Self {
        Self {
            status: progress.status(),
            progress_percentage: progress.percentage(),
        }
    }
}

impl EnrollmentDto {
    pub(crate) fn into_domain(self, user: UserId) -> Enrollment {
        Enrollment::new(
            user,
            CourseId::new(self.course_id),
            self.enrolled_at,
            self.completed_at,
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
