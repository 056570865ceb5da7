use chrono::{DateTime, Utc};

use crate::model::ids::{CourseId, UserId};

/// A user's membership in a course.
///
/// The backend also stores a denormalized progress percentage per
/// enrollment; the client ignores it and always derives course progress
/// from lesson records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    #[must_use]
    pub fn new(
        user_id: UserId,
        course_id: CourseId,
        enrolled_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user_id,
            course_id,
            enrolled_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
