use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{LessonId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("completion percentage must be 0-100, got {0}")]
    PercentageOutOfRange(u8),

    #[error("status {status:?} is inconsistent with percentage {percentage}")]
    StatusPercentageMismatch { status: LessonStatus, percentage: u8 },
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Completion state of one lesson for one user.
///
/// The canonical wire vocabulary is the backend enum (`not_started`,
/// `in_progress`, `completed`). The legacy spelling `current` is accepted on
/// input as an alias for `in_progress` and never produced on output.
///
/// Every transition is permitted, including `Completed -> InProgress`
/// (un-marking via the toggle) and `NotStarted -> Completed` (bulk
/// completion); progression is not required to be monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    #[default]
    NotStarted,
    #[serde(alias = "current")]
    InProgress,
    Completed,
}

//
// ─── LESSON PROGRESS ───────────────────────────────────────────────────────────
//

/// Per-(user, lesson) progress record; the only unit of truth for
/// "is this lesson done".
///
/// Invariants, enforced at construction:
/// - percentage is 0-100,
/// - `Completed` if and only if percentage == 100,
/// - `NotStarted` implies percentage == 0.
///
/// Records synthesized client-side for lessons the backend has never seen
/// carry no timestamps; persisted records carry whatever the backend stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonProgress {
    user_id: UserId,
    lesson_id: LessonId,
    status: LessonStatus,
    percentage: u8,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    /// Creates a progress record without timestamps.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the status/percentage invariant is
    /// violated.
    pub fn new(
        user_id: UserId,
        lesson_id: LessonId,
        status: LessonStatus,
        percentage: u8,
    ) -> Result<Self, ProgressError> {
        Self::from_persisted(user_id, lesson_id, status, percentage, None, None, None)
    }

    /// Rehydrates a progress record from backend data.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the status/percentage invariant is
    /// violated.
    pub fn from_persisted(
        user_id: UserId,
        lesson_id: LessonId,
        status: LessonStatus,
        percentage: u8,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ProgressError> {
        if percentage > 100 {
            return Err(ProgressError::PercentageOutOfRange(percentage));
        }
        let consistent = match status {
            LessonStatus::NotStarted => percentage == 0,
            LessonStatus::InProgress => percentage < 100,
            LessonStatus::Completed => percentage == 100,
        };
        if !consistent {
            return Err(ProgressError::StatusPercentageMismatch { status, percentage });
        }

        Ok(Self {
            user_id,
            lesson_id,
            status,
            percentage,
            started_at,
            completed_at,
            updated_at,
        })
    }

    /// The normalized default for a lesson the backend has no record of.
    #[must_use]
    pub fn not_started(user_id: UserId, lesson_id: LessonId) -> Self {
        Self {
            user_id,
            lesson_id,
            status: LessonStatus::NotStarted,
            percentage: 0,
            started_at: None,
            completed_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn status(&self) -> LessonStatus {
        self.status
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == LessonStatus::Completed
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
