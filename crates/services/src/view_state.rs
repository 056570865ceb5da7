//! Load state for page sections, with a stale-result guard.
//!
//! The UI event loop is single-threaded: fetches resolve asynchronously and
//! apply their results back to section state. If the user navigates away
//! (or a newer fetch starts) before a result lands, that result must be
//! discarded, never applied. `TrackedSection` enforces this with a
//! per-fetch token.

/// Load state of one page section.
///
/// `Failed` means the value is unknown because the fetch failed. It is a
/// distinct state from `Ready` with a zero value, so the UI can show
/// "couldn't load progress" instead of a false 0%.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SectionState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed,
}

impl<T> SectionState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Identifies one fetch attempt against a `TrackedSection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Section state plus the stale-result guard.
///
/// Each `begin` invalidates all previously issued tokens; a `resolve` with
/// a stale token is a no-op. Purely synchronous: the UI event loop owns it,
/// so no locks are involved.
#[derive(Debug)]
pub struct TrackedSection<T> {
    state: SectionState<T>,
    generation: u64,
}

impl<T> Default for TrackedSection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TrackedSection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SectionState::Idle,
            generation: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SectionState<T> {
        &self.state
    }

    /// Marks the section loading and returns the token the eventual result
    /// must present.
    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        self.state = SectionState::Loading;
        RequestToken(self.generation)
    }

    /// Applies a settled fetch result. Returns `false` (leaving the state
    /// untouched) when the token is stale because a newer fetch or a reset
    /// superseded it.
    pub fn resolve<E>(&mut self, token: RequestToken, result: Result<T, E>) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.state = match result {
            Ok(value) => SectionState::Ready(value),
            Err(_) => SectionState::Failed,
        };
        true
    }

    /// Abandons any in-flight fetch and returns the section to `Idle`,
    /// e.g. when the user navigates away.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = SectionState::Idle;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
