use tracing::warn;

use jijue_core::model::{LessonProgress, LessonStatus};

use crate::error::ProgressServiceError;
use crate::progress_service::ProgressService;

/// Optimistic editor for the lesson the player currently shows.
///
/// Mutations apply to the displayed value immediately, then write through
/// the progress store. On success the server echo replaces the display; on
/// failure the prior value is restored and the error propagates so the UI
/// can offer a retry. No silent failure.
#[derive(Debug, Clone)]
pub struct LessonProgressEditor {
    displayed: LessonProgress,
}

impl LessonProgressEditor {
    #[must_use]
    pub fn new(current: LessonProgress) -> Self {
        Self { displayed: current }
    }

    /// The value the UI should render right now.
    #[must_use]
    pub fn displayed(&self) -> &LessonProgress {
        &self.displayed
    }

    /// Optimistically move the lesson to the given status/percentage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::InvalidState` without touching the
    /// display if the combination is invalid, or the write error after
    /// rolling the display back.
    pub async fn set_status(
        &mut self,
        service: &ProgressService,
        status: LessonStatus,
        percentage: u8,
    ) -> Result<(), ProgressServiceError> {
        let user = self.displayed.user_id();
        let lesson = self.displayed.lesson_id();

        // Validate first so an invalid value never flashes on screen.
        let optimistic = LessonProgress::new(user, lesson, status, percentage)?;
        let prior = std::mem::replace(&mut self.displayed, optimistic);

        match service
            .set_lesson_progress(user, lesson, status, percentage)
            .await
        {
            Ok(saved) => {
                self.displayed = saved;
                Ok(())
            }
            Err(err) => {
                warn!(%lesson, "progress write failed, reverting optimistic update");
                self.displayed = prior;
                Err(err)
            }
        }
    }

    /// The completion toggle, optimistically applied.
    ///
    /// # Errors
    ///
    /// Same as [`LessonProgressEditor::set_status`].
    pub async fn toggle_completed(
        &mut self,
        service: &ProgressService,
    ) -> Result<(), ProgressServiceError> {
        if self.displayed.is_completed() {
            self.set_status(service, LessonStatus::InProgress, 0).await
        } else {
            self.set_status(service, LessonStatus::Completed, 100).await
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
    use jijue_core::model::{LessonId, UserId};
    use jijue_core::time::fixed_clock;
    use std::sync::Arc;

    fn setup() -> (InMemoryApi, ProgressService, LessonProgressEditor) {
        let api = InMemoryApi::new();
        let service = ProgressService::new(fixed_clock(), Arc::new(api.clone()));
        let editor =
            LessonProgressEditor::new(LessonProgress::not_started(UserId::new(1), LessonId::new(1)));
        (api, service, editor)
    }

    #[tokio::test]
    async fn successful_write_keeps_the_server_echo() {
        let (_api, service, mut editor) = setup();

        editor.toggle_completed(&service).await.unwrap();

        assert!(editor.displayed().is_completed());
        // The echo carries the timestamps the store stamped.
        assert!(editor.displayed().completed_at().is_some());
    }

    #[tokio::test]
    async fn failed_write_rolls_the_display_back() {
        let (api, service, mut editor) = setup();
        api.fail_writes(true);

        let before = editor.displayed().clone();
        let err = editor.toggle_completed(&service).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(editor.displayed(), &before);
    }

    #[tokio::test]
    async fn invalid_state_never_touches_the_display() {
        let (_api, service, mut editor) = setup();

        let before = editor.displayed().clone();
        let err = editor
            .set_status(&service, LessonStatus::Completed, 50)
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressServiceError::InvalidState(_)));
        assert_eq!(editor.displayed(), &before);
    }
}
