//! Mutable session state.
//!
//! [`AppState`] sits behind a mutex inside [`crate::session::Session`]; every
//! operation locks it briefly and never holds the lock across an `.await`.

use iesgo_shared::types::{Match, SwipeAction, Theme, User};
use iesgo_shared::Filters;
use iesgo_store::{PersistedState, Threads};

pub struct AppState {
    /// Signed-in profile. `None` until login or restore.
    pub current_user: Option<User>,

    /// Append-only swipe log.
    pub swipes: Vec<SwipeAction>,

    /// Matches, newest first.
    pub matches: Vec<Match>,

    /// Message threads keyed by match id, in append order.
    pub messages: Threads,

    /// Active discovery filters. Not persisted.
    pub filters: Filters,

    pub theme: Theme,

    /// A login round trip is in flight.
    pub is_loading: bool,

    /// A verification request is in flight.
    pub is_verifying: bool,

    /// Bumped on every logout so in-flight work can tell it is stale.
    pub epoch: u64,
}

impl AppState {
    /// Create a new, signed-out state.
    pub fn new() -> Self {
        Self {
            current_user: None,
            swipes: Vec::new(),
            matches: Vec::new(),
            messages: Threads::new(),
            filters: Filters::default(),
            theme: Theme::default(),
            is_loading: false,
            is_verifying: false,
            epoch: 0,
        }
    }

    /// Rebuild from whatever survived in storage.
    pub fn from_persisted(saved: PersistedState) -> Self {
        Self {
            current_user: saved.user,
            swipes: saved.swipes.unwrap_or_default(),
            matches: saved.matches.unwrap_or_default(),
            messages: saved.messages.unwrap_or_default(),
            theme: saved.theme.unwrap_or_default(),
            ..Self::new()
        }
    }

    /// Forget everything tied to the signed-in user. The theme survives.
    pub fn reset_session(&mut self) {
        self.current_user = None;
        self.swipes.clear();
        self.matches.clear();
        self.messages.clear();
        self.filters.clear();
        self.is_loading = false;
        self.is_verifying = false;
        self.epoch += 1;
    }

    /// Snapshot of the persistable part of the state.
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            user: self.current_user.clone(),
            matches: Some(self.matches.clone()),
            messages: Some(self.messages.clone()),
            swipes: Some(self.swipes.clone()),
            theme: Some(self.theme),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iesgo_shared::catalog::default_profile;

    #[test]
    fn test_reset_keeps_theme_and_bumps_epoch() {
        let mut state = AppState::new();
        state.current_user = Some(default_profile("a@b.c"));
        state.theme = Theme::Dark;
        state.filters.toggle_course("Direito");
        state.is_verifying = true;

        state.reset_session();

        assert!(state.current_user.is_none());
        assert!(state.filters.is_empty());
        assert!(!state.is_verifying);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.epoch, 1);
    }

    #[test]
    fn test_persisted_round_trip() {
        let mut state = AppState::new();
        state.current_user = Some(default_profile("a@b.c"));
        state.theme = Theme::Dark;

        let back = AppState::from_persisted(state.to_persisted());
        assert_eq!(back.current_user, state.current_user);
        assert_eq!(back.theme, Theme::Dark);
        assert!(back.matches.is_empty());
    }
}
