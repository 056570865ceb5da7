use std::collections::HashMap;
use std::sync::Arc;

use api::CatalogApi;
use jijue_core::aggregate::{aggregate_course, aggregate_module, CourseProgress, ModuleProgress};
use jijue_core::model::{Course, CourseId, Lesson, LessonId, LessonProgress, ModuleId, UserId};
use jijue_core::navigate::{next_lesson_in_module, resolve_continue_target, ContinueLearning};

use crate::error::CourseServiceError;
use crate::progress_service::ProgressService;

/// Presentation-agnostic rollup for one module of a course page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOverview {
    pub module_id: ModuleId,
    pub title: String,
    pub progress: ModuleProgress,
    /// First non-completed lesson in authored order, if any.
    pub next_lesson: Option<LessonId>,
}

/// Everything the course page needs, aggregated from settled fetches.
///
/// Not a UI view-model: no pre-formatted strings, no locale assumptions.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseOverview {
    pub course: Course,
    pub progress_by_lesson: HashMap<LessonId, LessonProgress>,
    pub course_progress: CourseProgress,
    pub modules: Vec<ModuleOverview>,
    pub continue_learning: ContinueLearning,
}

/// Fetches a course and its progress records, then derives the rollups.
#[derive(Clone)]
pub struct CourseService {
    catalog: Arc<dyn CatalogApi>,
    progress: ProgressService,
}

impl CourseService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>, progress: ProgressService) -> Self {
        Self { catalog, progress }
    }

    /// Load one course and aggregate the user's progress through it.
    ///
    /// Aggregation runs only after every lesson's progress fetch has
    /// settled. A partially-populated map is never aggregated: any read
    /// failure aborts the overview, so the caller renders "progress
    /// unknown" rather than a transiently undercounted percentage.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` if the course cannot be fetched or any
    /// progress read fails.
    pub async fn course_overview(
        &self,
        user: UserId,
        course_id: CourseId,
    ) -> Result<CourseOverview, CourseServiceError> {
        let course = self.catalog.get_course(course_id).await?;

        let lesson_ids: Vec<LessonId> = course.lessons().map(Lesson::id).collect();
        let mut progress_by_lesson = HashMap::with_capacity(lesson_ids.len());
        for lesson_id in lesson_ids {
            let record = self.progress.lesson_progress(user, lesson_id).await?;
            progress_by_lesson.insert(lesson_id, record);
        }

        let course_progress = aggregate_course(&course, &progress_by_lesson);
        let modules = course
            .modules()
            .iter()
            .map(|module| ModuleOverview {
                module_id: module.id(),
                title: module.title().to_owned(),
                progress: aggregate_module(module, &progress_by_lesson),
                next_lesson: next_lesson_in_module(module, &progress_by_lesson).map(Lesson::id),
            })
            .collect();
        let continue_learning = resolve_continue_target(&course, &progress_by_lesson);

        Ok(CourseOverview {
            course,
            progress_by_lesson,
            course_progress,
            modules,
            continue_learning,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryApi;
    use jijue_core::model::{
        CourseAccent, CourseIcon, LessonStatus, Module,
    };
    use jijue_core::time::fixed_clock;

    fn seed_course(api: &InMemoryApi) {
        let m1 = Module::new(
            ModuleId::new(1),
            CourseId::new(1),
            "Module 1: HIV Basics",
            None,
            vec![
                Lesson::new(LessonId::new(1), ModuleId::new(1), "What is HIV?", None, 12).unwrap(),
                Lesson::new(
                    LessonId::new(2),
                    ModuleId::new(1),
                    "A Brief History of the Epidemic",
                    None,
                    15,
                )
                .unwrap(),
            ],
        )
        .unwrap();
        let m2 = Module::new(
            ModuleId::new(2),
            CourseId::new(1),
            "Module 2: Understanding Transmission",
            None,
            vec![Lesson::new(
                LessonId::new(3),
                ModuleId::new(2),
                "How HIV is Transmitted",
                None,
                18,
            )
            .unwrap()],
        )
        .unwrap();
        api.insert_course(
            Course::new(
                CourseId::new(1),
                "Introduction to HIV",
                None,
                Some("HIV Basics".into()),
                CourseIcon::HeartPulse,
                CourseAccent::Primary,
                vec![m1, m2],
            )
            .unwrap(),
        );
    }

    fn service(api: &InMemoryApi) -> CourseService {
        CourseService::new(
            Arc::new(api.clone()),
            ProgressService::new(fixed_clock(), Arc::new(api.clone())),
        )
    }

    #[tokio::test]
    async fn overview_aggregates_after_all_fetches_settle() {
        let api = InMemoryApi::new();
        seed_course(&api);
        let user = UserId::new(7);
        api.seed_progress(
            LessonProgress::new(user, LessonId::new(1), LessonStatus::Completed, 100).unwrap(),
        );

        let overview = service(&api)
            .course_overview(user, CourseId::new(1))
            .await
            .unwrap();

        assert_eq!(overview.course_progress.completed_lessons, 1);
        assert_eq!(overview.course_progress.total_lessons, 3);
        assert_eq!(overview.course_progress.percentage, 33);
        assert_eq!(
            overview.continue_learning.target().map(|t| t.lesson_id),
            Some(LessonId::new(2))
        );
        assert_eq!(overview.modules[0].progress.percentage, 50);
        assert_eq!(overview.modules[0].next_lesson, Some(LessonId::new(2)));
        assert_eq!(overview.modules[1].next_lesson, Some(LessonId::new(3)));
    }

    #[tokio::test]
    async fn read_failure_aborts_the_overview() {
        let api = InMemoryApi::new();
        seed_course(&api);
        api.fail_reads(true);

        let err = service(&api)
            .course_overview(UserId::new(7), CourseId::new(1))
            .await
            .unwrap_err();
        // The section shows an error state; no partial aggregate escapes.
        assert!(matches!(err, CourseServiceError::Api(_)));
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let api = InMemoryApi::new();
        let err = service(&api)
            .course_overview(UserId::new(7), CourseId::new(99))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CourseServiceError::Api(api::ApiError::NotFound)
        ));
    }
}
