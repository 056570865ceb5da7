use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use jijue_core::model::{Theme, UiPreferences};

use crate::error::PreferencesServiceError;

/// Errors surfaced by preference stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferenceStoreError {
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence contract for UI preferences (the platform's local-storage
/// equivalent).
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Load persisted preferences, `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `PreferenceStoreError` if the store cannot be read.
    async fn load(&self) -> Result<Option<UiPreferences>, PreferenceStoreError>;

    /// Persist the given preferences.
    ///
    /// # Errors
    ///
    /// Returns `PreferenceStoreError` if the store cannot be written.
    async fn save(&self, preferences: &UiPreferences) -> Result<(), PreferenceStoreError>;
}

/// In-memory store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryPreferences {
    inner: Arc<Mutex<Option<UiPreferences>>>,
}

impl InMemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferencesStore for InMemoryPreferences {
    async fn load(&self) -> Result<Option<UiPreferences>, PreferenceStoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| PreferenceStoreError::Unavailable(e.to_string()))?;
        Ok(*guard)
    }

    async fn save(&self, preferences: &UiPreferences) -> Result<(), PreferenceStoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| PreferenceStoreError::Unavailable(e.to_string()))?;
        *guard = Some(*preferences);
        Ok(())
    }
}

/// One process-wide owner for UI preferences with an explicit load/persist
/// lifecycle, replacing per-page theme state.
#[derive(Clone)]
pub struct PreferencesService {
    store: Arc<dyn PreferencesStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(store: Arc<dyn PreferencesStore>) -> Self {
        Self { store }
    }

    /// Load persisted preferences, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on store failures.
    pub async fn load(&self) -> Result<UiPreferences, PreferencesServiceError> {
        Ok(self.store.load().await?.unwrap_or_default())
    }

    /// Persist the given preferences.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on store failures.
    pub async fn save(&self, preferences: UiPreferences) -> Result<(), PreferencesServiceError> {
        self.store.save(&preferences).await?;
        Ok(())
    }

    /// Set and persist the theme, returning the updated preferences.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on store failures.
    pub async fn set_theme(&self, theme: Theme) -> Result<UiPreferences, PreferencesServiceError> {
        let mut preferences = self.load().await?;
        preferences.theme = theme;
        self.save(preferences).await?;
        Ok(preferences)
    }

    /// Flip light/dark and persist, returning the updated preferences.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on store failures.
    pub async fn toggle_theme(&self) -> Result<UiPreferences, PreferencesServiceError> {
        let current = self.load().await?;
        self.set_theme(current.theme.toggled()).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
