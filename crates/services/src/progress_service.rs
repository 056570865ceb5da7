use std::sync::Arc;

use api::{ApiError, ProgressApi};
use jijue_core::model::{LessonId, LessonProgress, LessonStatus, UserId};
use jijue_core::Clock;

use crate::error::ProgressServiceError;

/// Single source of truth lookup for one lesson's progress.
///
/// Reads normalize a missing backend record to "not started" instead of
/// surfacing an error; writes validate the status/percentage invariant
/// before anything goes on the wire. Dependent aggregates (module/course)
/// are derived on demand rather than cached, so a successful write needs no
/// explicit invalidation; a rewrite that adds caching must invalidate here.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    api: Arc<dyn ProgressApi>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn ProgressApi>) -> Self {
        Self { clock, api }
    }

    /// Load one lesson's progress, normalizing NotFound to not-started.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Api` on transport failures; NotFound
    /// is never propagated.
    pub async fn lesson_progress(
        &self,
        user: UserId,
        lesson: LessonId,
    ) -> Result<LessonProgress, ProgressServiceError> {
        match self.api.get_lesson_progress(user, lesson).await {
            Ok(progress) => Ok(progress),
            Err(ApiError::NotFound) => Ok(LessonProgress::not_started(user, lesson)),
            Err(err) => Err(err.into()),
        }
    }

    /// Upsert one lesson's progress.
    ///
    /// Lifecycle timestamps are stamped from the service clock: started-at
    /// is set once when the lesson first leaves NotStarted, completed-at is
    /// set once on completion and preserved across repeated completion
    /// writes (so the upsert is idempotent), and cleared when a completed
    /// lesson is un-marked.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::InvalidState` if status and percentage
    /// are inconsistent (checked before any network traffic), or
    /// `ProgressServiceError::Api` if the write fails.
    pub async fn set_lesson_progress(
        &self,
        user: UserId,
        lesson: LessonId,
        status: LessonStatus,
        percentage: u8,
    ) -> Result<LessonProgress, ProgressServiceError> {
        LessonProgress::new(user, lesson, status, percentage)?;

        let existing = self.lesson_progress(user, lesson).await?;
        let now = self.clock.now();

        let started_at = match status {
            LessonStatus::NotStarted => None,
            _ => existing.started_at().or(Some(now)),
        };
        let completed_at = match status {
            LessonStatus::Completed => existing.completed_at().or(Some(now)),
            _ => None,
        };

        let record = LessonProgress::from_persisted(
            user,
            lesson,
            status,
            percentage,
            started_at,
            completed_at,
            Some(now),
        )?;
        Ok(self.api.put_lesson_progress(&record).await?)
    }

    /// Convenience for the "mark as complete" action.
    ///
    /// # Errors
    ///
    /// Same as [`ProgressService::set_lesson_progress`].
    pub async fn mark_completed(
        &self,
        user: UserId,
        lesson: LessonId,
    ) -> Result<LessonProgress, ProgressServiceError> {
        self.set_lesson_progress(user, lesson, LessonStatus::Completed, 100)
            .await
    }

    /// The UI's completion toggle: completes a non-completed lesson,
    /// un-marks a completed one back to in-progress at 0%.
    ///
    /// # Errors
    ///
    /// Same as [`ProgressService::set_lesson_progress`].
    pub async fn toggle_completed(
        &self,
        user: UserId,
        lesson: LessonId,
    ) -> Result<LessonProgress, ProgressServiceError> {
        let current = self.lesson_progress(user, lesson).await?;
        if current.is_completed() {
            self.set_lesson_progress(user, lesson, LessonStatus::InProgress, 0)
                .await
        } else {
            self.mark_completed(user, lesson).await
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryApi;
    use jijue_core::time::{fixed_clock, fixed_now};

    fn service(api: &InMemoryApi) -> ProgressService {
        ProgressService::new(fixed_clock(), Arc::new(api.clone()))
    }

    #[tokio::test]
    async fn missing_record_reads_as_not_started() {
        let api = InMemoryApi::new();
        let progress = service(&api)
            .lesson_progress(UserId::new(1), LessonId::new(1))
            .await
            .unwrap();
        assert_eq!(progress.status(), LessonStatus::NotStarted);
        assert_eq!(progress.percentage(), 0);
    }

    #[tokio::test]
    async fn invalid_state_is_rejected_before_the_write() {
        let api = InMemoryApi::new();
        api.fail_writes(true); // would fail if the write were attempted

        let err = service(&api)
            .set_lesson_progress(UserId::new(1), LessonId::new(1), LessonStatus::Completed, 50)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::InvalidState(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn completion_stamps_timestamps_once() {
        let api = InMemoryApi::new();
        let svc = service(&api);
        let user = UserId::new(1);
        let lesson = LessonId::new(1);

        let first = svc.mark_completed(user, lesson).await.unwrap();
        assert_eq!(first.completed_at(), Some(fixed_now()));
        assert_eq!(first.started_at(), Some(fixed_now()));

        let second = svc.mark_completed(user, lesson).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn toggle_unmarks_a_completed_lesson() {
        let api = InMemoryApi::new();
        let svc = service(&api);
        let user = UserId::new(1);
        let lesson = LessonId::new(1);

        svc.mark_completed(user, lesson).await.unwrap();
        let toggled = svc.toggle_completed(user, lesson).await.unwrap();

        assert_eq!(toggled.status(), LessonStatus::InProgress);
        assert_eq!(toggled.percentage(), 0);
        assert_eq!(toggled.completed_at(), None);
        // started_at survives the un-mark.
        assert_eq!(toggled.started_at(), Some(fixed_now()));
    }

    #[tokio::test]
    async fn toggle_completes_a_fresh_lesson() {
        let api = InMemoryApi::new();
        let svc = service(&api);

        let toggled = svc
            .toggle_completed(UserId::new(1), LessonId::new(9))
            .await
            .unwrap();
        assert!(toggled.is_completed());
        assert_eq!(toggled.percentage(), 100);
    }

    #[tokio::test]
    async fn write_failure_surfaces_as_retryable_api_error() {
        let api = InMemoryApi::new();
        api.fail_writes(true);

        let err = service(&api)
            .mark_completed(UserId::new(1), LessonId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::Api(_)));
        assert!(err.is_retryable());
    }
}
