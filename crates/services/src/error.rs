//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use jijue_core::model::ProgressError;

use crate::preferences::PreferenceStoreError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    /// The requested status/percentage combination violates the progress
    /// invariant; rejected before any network traffic.
    #[error(transparent)]
    InvalidState(#[from] ProgressError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ProgressServiceError {
    /// Whether the UI should offer a retry for this failure.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidState(_) => false,
            Self::Api(err) => err.is_retryable(),
        }
    }
}

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Course(#[from] CourseServiceError),
}

/// Errors emitted by `PreferencesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesServiceError {
    #[error(transparent)]
    Store(#[from] PreferenceStoreError),
}
