use std::sync::Arc;

use api::EnrollmentApi;
use jijue_core::aggregate::CourseProgress;
use jijue_core::model::{CourseAccent, CourseIcon, CourseId, LessonId, ModuleId, UserId};
use jijue_core::navigate::{ContinueLearning, ContinueTarget};

use crate::course_service::{CourseOverview, CourseService};
use crate::error::DashboardError;

/// One enrolled course on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCard {
    pub course_id: CourseId,
    pub title: String,
    pub category: Option<String>,
    pub icon: CourseIcon,
    pub accent: CourseAccent,
    pub progress: CourseProgress,
    pub continue_learning: ContinueLearning,
}

/// The single dashboard-level "Continue Learning" call to action, resolved
/// to lesson granularity with the titles the card displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuePrompt {
    pub course_id: CourseId,
    pub course_title: String,
    pub module_id: ModuleId,
    pub module_title: String,
    pub lesson_id: LessonId,
    pub lesson_title: String,
}

/// Aggregated dashboard data for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Cards in enrollment order.
    pub cards: Vec<CourseCard>,
    pub completed_courses: usize,
    /// `None` when the user has no enrollments or has finished everything.
    pub continue_learning: Option<ContinuePrompt>,
}

/// Builds the dashboard from enrollments plus per-course overviews.
#[derive(Clone)]
pub struct DashboardService {
    enrollments: Arc<dyn EnrollmentApi>,
    courses: CourseService,
}

impl DashboardService {
    #[must_use]
    pub fn new(enrollments: Arc<dyn EnrollmentApi>, courses: CourseService) -> Self {
        Self {
            enrollments,
            courses,
        }
    }

    /// Load the dashboard for a user.
    ///
    /// The continue-learning prompt is the first enrolled course (in
    /// enrollment order) that is not yet complete, resolved through the
    /// standard module-then-lesson scan.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError` if enrollments or any course overview
    /// cannot be fetched; the dashboard is all-or-nothing so a partial
    /// progress picture is never rendered.
    pub async fn dashboard(&self, user: UserId) -> Result<DashboardSummary, DashboardError> {
        let enrollments = self.enrollments.list_enrollments(user).await?;

        let mut cards = Vec::with_capacity(enrollments.len());
        let mut continue_learning = None;
        for enrollment in enrollments {
            let overview = self.courses.course_overview(user, enrollment.course_id).await?;

            if continue_learning.is_none() {
                if let ContinueLearning::Resume(target) = overview.continue_learning {
                    continue_learning = prompt_for(&overview, target);
                }
            }

            cards.push(CourseCard {
                course_id: overview.course.id(),
                title: overview.course.title().to_owned(),
                category: overview.course.category().map(str::to_owned),
                icon: overview.course.icon(),
                accent: overview.course.accent(),
                progress: overview.course_progress,
                continue_learning: overview.continue_learning,
            });
        }

        let completed_courses = cards
            .iter()
            .filter(|card| card.continue_learning.is_complete())
            .count();

        Ok(DashboardSummary {
            cards,
            completed_courses,
            continue_learning,
        })
    }
}

fn prompt_for(overview: &CourseOverview, target: ContinueTarget) -> Option<ContinuePrompt> {
    let module = overview
        .course
        .modules()
        .iter()
        .find(|m| m.id() == target.module_id)?;
    let lesson = module
        .lessons()
        .iter()
        .find(|l| l.id() == target.lesson_id)?;

    Some(ContinuePrompt {
        course_id: target.course_id,
        course_title: overview.course.title().to_owned(),
        module_id: target.module_id,
        module_title: module.title().to_owned(),
        lesson_id: target.lesson_id,
        lesson_title: lesson.title().to_owned(),
    })
}
