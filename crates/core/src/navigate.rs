//! Continue-learning resolution.
//!
//! Decides the single actionable "next lesson" for a user, at module or
//! course granularity. Sequencing follows the authored module/lesson order
//! only, never completion time or id sort.

use std::collections::HashMap;

use crate::model::{Course, CourseId, Lesson, LessonId, LessonProgress, Module, ModuleId};

/// Reference to the lesson a "Continue Learning" action should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinueTarget {
    pub course_id: CourseId,
    pub module_id: ModuleId,
    pub lesson_id: LessonId,
}

/// Outcome of continue-learning resolution for a course.
///
/// `CourseComplete` is a distinct state, not an absent target: the UI
/// renders a completed affordance for it instead of a navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueLearning {
    Resume(ContinueTarget),
    CourseComplete,
}

impl ContinueLearning {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::CourseComplete)
    }

    #[must_use]
    pub fn target(&self) -> Option<ContinueTarget> {
        match self {
            Self::Resume(target) => Some(*target),
            Self::CourseComplete => None,
        }
    }
}

fn needs_attention(lesson: &Lesson, progress: &HashMap<LessonId, LessonProgress>) -> bool {
    !progress
        .get(&lesson.id())
        .is_some_and(LessonProgress::is_completed)
}

/// First lesson in authored order that is not completed; `None` when the
/// whole module is done.
///
/// Lessons missing from the progress map count as not started, so a module
/// with no recorded progress resolves to its first lesson.
#[must_use]
pub fn next_lesson_in_module<'a>(
    module: &'a Module,
    progress: &HashMap<LessonId, LessonProgress>,
) -> Option<&'a Lesson> {
    module
        .lessons()
        .iter()
        .find(|lesson| needs_attention(lesson, progress))
}

/// Scans modules in order, lessons in order, and returns the first
/// non-completed lesson as the continue target.
///
/// Modules with zero lessons are skipped; they cannot be navigation
/// targets. When every lesson is completed (or the course has none), the
/// result is `ContinueLearning::CourseComplete`.
#[must_use]
pub fn resolve_continue_target(
    course: &Course,
    progress: &HashMap<LessonId, LessonProgress>,
) -> ContinueLearning {
    for module in course.modules() {
        if let Some(lesson) = next_lesson_in_module(module, progress) {
            return ContinueLearning::Resume(ContinueTarget {
                course_id: course.id(),
                module_id: module.id(),
                lesson_id: lesson.id(),
            });
        }
    }
    ContinueLearning::CourseComplete
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseAccent, CourseIcon, LessonStatus, UserId};

    fn lesson(id: u64, module: u64) -> Lesson {
        Lesson::new(
            LessonId::new(id),
            ModuleId::new(module),
            format!("Lesson {id}"),
            None,
            10,
        )
        .unwrap()
    }

    fn module(id: u64, lessons: Vec<Lesson>) -> Module {
        Module::new(
            ModuleId::new(id),
            CourseId::new(1),
            format!("Module {id}"),
            None,
            lessons,
        )
        .unwrap()
    }

    fn course(modules: Vec<Module>) -> Course {
        Course::new(
            CourseId::new(1),
            "Course",
            None,
            None,
            CourseIcon::default(),
            CourseAccent::default(),
            modules,
        )
        .unwrap()
    }

    fn entry(lesson: u64, status: LessonStatus, pct: u8) -> (LessonId, LessonProgress) {
        (
            LessonId::new(lesson),
            LessonProgress::new(UserId::new(1), LessonId::new(lesson), status, pct).unwrap(),
        )
    }

    #[test]
    fn first_non_completed_lesson_wins_across_modules() {
        // Module A: [completed, not started], module B: [not started].
        let a = module(1, vec![lesson(1, 1), lesson(2, 1)]);
        let b = module(2, vec![lesson(3, 2)]);
        let c = course(vec![a, b]);
        let progress = HashMap::from([entry(1, LessonStatus::Completed, 100)]);

        let resolved = resolve_continue_target(&c, &progress);
        assert_eq!(
            resolved.target().map(|t| t.lesson_id),
            Some(LessonId::new(2))
        );
    }

    #[test]
    fn resolution_is_sensitive_to_module_order() {
        let a = module(1, vec![lesson(1, 1)]);
        let b = module(2, vec![lesson(2, 2)]);
        let progress = HashMap::new();

        let forward = resolve_continue_target(&course(vec![a.clone(), b.clone()]), &progress);
        let reversed = resolve_continue_target(&course(vec![b, a]), &progress);

        assert_eq!(
            forward.target().map(|t| t.lesson_id),
            Some(LessonId::new(1))
        );
        assert_eq!(
            reversed.target().map(|t| t.lesson_id),
            Some(LessonId::new(2))
        );
    }

    #[test]
    fn in_progress_lesson_is_the_target_not_skipped() {
        let m = module(1, vec![lesson(1, 1), lesson(2, 1)]);
        let c = course(vec![m]);
        let progress = HashMap::from([entry(1, LessonStatus::InProgress, 40)]);

        let resolved = resolve_continue_target(&c, &progress);
        assert_eq!(
            resolved.target().map(|t| t.lesson_id),
            Some(LessonId::new(1))
        );
    }

    #[test]
    fn empty_module_is_skipped_in_the_scan() {
        let empty = module(1, vec![]);
        let next = module(2, vec![lesson(1, 2)]);
        let c = course(vec![empty, next]);

        let resolved = resolve_continue_target(&c, &HashMap::new());
        let target = resolved.target().unwrap();
        assert_eq!(target.module_id, ModuleId::new(2));
        assert_eq!(target.lesson_id, LessonId::new(1));
    }

    #[test]
    fn fully_completed_course_resolves_to_complete_sentinel() {
        let m = module(1, vec![lesson(1, 1)]);
        let c = course(vec![m]);
        let progress = HashMap::from([entry(1, LessonStatus::Completed, 100)]);

        let resolved = resolve_continue_target(&c, &progress);
        assert!(resolved.is_complete());
        assert_eq!(resolved.target(), None);
    }

    #[test]
    fn course_with_no_lessons_is_complete() {
        let c = course(vec![module(1, vec![])]);
        assert!(resolve_continue_target(&c, &HashMap::new()).is_complete());
    }

    #[test]
    fn next_lesson_in_module_respects_authored_order() {
        let m = module(1, vec![lesson(5, 1), lesson(2, 1), lesson(9, 1)]);
        let progress = HashMap::from([entry(5, LessonStatus::Completed, 100)]);

        // Lesson 2 comes before lesson 9 in authored order even though 9 > 2
        // would sort differently.
        let next = next_lesson_in_module(&m, &progress).unwrap();
        assert_eq!(next.id(), LessonId::new(2));
    }

    #[test]
    fn next_lesson_is_none_when_module_done() {
        let m = module(1, vec![lesson(1, 1)]);
        let progress = HashMap::from([entry(1, LessonStatus::Completed, 100)]);
        assert!(next_lesson_in_module(&m, &progress).is_none());
    }
}
