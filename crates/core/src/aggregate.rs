//! Derived completion rollups.
//!
//! Module and course progress are never persisted; they are recomputed on
//! demand from the lesson progress map, so there is no cache to invalidate
//! when a lesson record changes.

use std::collections::HashMap;

use crate::model::{Course, CourseId, Lesson, LessonId, LessonProgress, Module, ModuleId};

/// Completion rollup for one module, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleProgress {
    pub module_id: ModuleId,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub percentage: u8,
}

/// Completion rollup for one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseProgress {
    pub course_id: CourseId,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub percentage: u8,
}

/// Rounded completed/total percentage; 0 when there is nothing to count.
fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // completed <= total, so the result is at most 100.
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

fn is_completed(lesson: &Lesson, progress: &HashMap<LessonId, LessonProgress>) -> bool {
    progress
        .get(&lesson.id())
        .is_some_and(LessonProgress::is_completed)
}

/// Computes the completion rollup for one module.
///
/// Pure function of the module's lesson list and the progress map; lessons
/// missing from the map count as not started. Only `Completed` lessons
/// count toward the numerator; an in-progress lesson contributes nothing.
#[must_use]
pub fn aggregate_module(
    module: &Module,
    progress: &HashMap<LessonId, LessonProgress>,
) -> ModuleProgress {
    let total = module.lessons().len();
    let completed = module
        .lessons()
        .iter()
        .filter(|lesson| is_completed(lesson, progress))
        .count();

    ModuleProgress {
        module_id: module.id(),
        completed_lessons: completed,
        total_lessons: total,
        percentage: completion_percentage(completed, total),
    }
}

/// Computes the completion rollup for a whole course.
///
/// Counts across every lesson of every module, flattened. NOT the average
/// of per-module percentages: a 1-lesson module and a 10-lesson module are
/// weighted by their actual size. Modules with zero lessons contribute to
/// neither numerator nor denominator.
#[must_use]
pub fn aggregate_course(
    course: &Course,
    progress: &HashMap<LessonId, LessonProgress>,
) -> CourseProgress {
    let total = course.total_lessons();
    let completed = course
        .lessons()
        .filter(|lesson| is_completed(lesson, progress))
        .count();

    CourseProgress {
        course_id: course.id(),
        completed_lessons: completed,
        total_lessons: total,
        percentage: completion_percentage(completed, total),
    }
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

    fn module(id: u64, course: u64, lessons: Vec<Lesson>) -> Module {
        Module::new(
            ModuleId::new(id),
            CourseId::new(course),
            format!("Module {id}"),
            None,
            lessons,
        )
        .unwrap()
    }

    fn course(id: u64, modules: Vec<Module>) -> Course {
        Course::new(
            CourseId::new(id),
            "Course",
            None,
            None,
            CourseIcon::default(),
            CourseAccent::default(),
            modules,
        )
        .unwrap()
    }

    fn completed(lesson: u64) -> (LessonId, LessonProgress) {
        (
            LessonId::new(lesson),
            LessonProgress::new(
                UserId::new(1),
                LessonId::new(lesson),
                LessonStatus::Completed,
                100,
            )
            .unwrap(),
        )
    }

    fn in_progress(lesson: u64, pct: u8) -> (LessonId, LessonProgress) {
        (
            LessonId::new(lesson),
            LessonProgress::new(
                UserId::new(1),
                LessonId::new(lesson),
                LessonStatus::InProgress,
                pct,
            )
            .unwrap(),
        )
    }

    #[test]
    fn empty_progress_map_yields_zero() {
        let m = module(1, 1, vec![lesson(1, 1), lesson(2, 1)]);
        let rollup = aggregate_module(&m, &HashMap::new());
        assert_eq!(rollup.completed_lessons, 0);
        assert_eq!(rollup.total_lessons, 2);
        assert_eq!(rollup.percentage, 0);
    }

    #[test]
    fn empty_module_yields_zero_not_nan() {
        let m = module(1, 1, vec![]);
        let rollup = aggregate_module(&m, &HashMap::new());
        assert_eq!(rollup.total_lessons, 0);
        assert_eq!(rollup.percentage, 0);
    }

    #[test]
    fn fully_completed_module_yields_100() {
        let m = module(1, 1, vec![lesson(1, 1), lesson(2, 1)]);
        let progress = HashMap::from([completed(1), completed(2)]);
        assert_eq!(aggregate_module(&m, &progress).percentage, 100);
    }

    #[test]
    fn in_progress_lessons_do_not_count_as_completed() {
        let m = module(1, 1, vec![lesson(1, 1), lesson(2, 1)]);
        let progress = HashMap::from([completed(1), in_progress(2, 90)]);
        let rollup = aggregate_module(&m, &progress);
        assert_eq!(rollup.completed_lessons, 1);
        assert_eq!(rollup.percentage, 50);
    }

    #[test]
    fn course_counts_lessons_not_module_averages() {
        // One lesson done out of 1+10: a module average would say 50%,
        // lesson counting says 9%.
        let small = module(1, 1, vec![lesson(1, 1)]);
        let big = module(2, 1, (10..20).map(|i| lesson(i, 2)).collect());
        let c = course(1, vec![small, big]);

        let progress = HashMap::from([completed(1)]);
        let rollup = aggregate_course(&c, &progress);
        assert_eq!(rollup.completed_lessons, 1);
        assert_eq!(rollup.total_lessons, 11);
        assert_eq!(rollup.percentage, 9);
    }

    #[test]
    fn one_of_three_rounds_to_33() {
        let a = module(1, 1, vec![lesson(1, 1), lesson(2, 1)]);
        let b = module(2, 1, vec![lesson(3, 2)]);
        let c = course(1, vec![a, b]);

        let progress = HashMap::from([completed(1)]);
        assert_eq!(aggregate_course(&c, &progress).percentage, 33);
    }

    #[test]
    fn course_totals_are_invariant_under_module_reordering() {
        let a = module(1, 1, vec![lesson(1, 1), lesson(2, 1)]);
        let b = module(2, 1, vec![lesson(3, 2)]);
        let progress = HashMap::from([completed(1), completed(3)]);

        let forward = aggregate_course(&course(1, vec![a.clone(), b.clone()]), &progress);
        let reversed = aggregate_course(&course(1, vec![b, a]), &progress);

        assert_eq!(forward.completed_lessons, reversed.completed_lessons);
        assert_eq!(forward.total_lessons, reversed.total_lessons);
        assert_eq!(forward.percentage, reversed.percentage);
    }

    #[test]
    fn empty_module_inside_course_is_excluded_without_error() {
        let empty = module(1, 1, vec![]);
        let full = module(2, 1, vec![lesson(1, 2), lesson(2, 2)]);
        let c = course(1, vec![empty, full]);

        let progress = HashMap::from([completed(1)]);
        let rollup = aggregate_course(&c, &progress);
        assert_eq!(rollup.total_lessons, 2);
        assert_eq!(rollup.percentage, 50);
    }

    #[test]
    fn zero_lesson_course_yields_zero() {
        let c = course(1, vec![]);
        assert_eq!(aggregate_course(&c, &HashMap::new()).percentage, 0);
    }
}
