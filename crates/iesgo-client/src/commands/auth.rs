use tracing::{info, warn};

use iesgo_shared::catalog::default_profile;
use iesgo_shared::constants::APP_KEYS;
use iesgo_shared::types::User;
use iesgo_shared::validation::validate_email;

use crate::commands::{BusyFlag, BusyGuard};
use crate::error::{ClientError, Result};
use crate::events::SessionEvent;
use crate::session::{lock, Session};

impl Session {
    /// Sign in with a campus email.
    ///
    /// A malformed address fails immediately with no state change. Otherwise
    /// the loading flag is raised for the simulated auth round trip, after
    /// which a fresh default profile carrying `email` becomes the current
    /// user. Nothing is written to storage while the round trip is pending,
    /// and a [`Session::logout`] during it cancels the sign-in.
    pub async fn login(&self, email: &str) -> Result<User> {
        let email = validate_email(email)?.to_string();

        let epoch = {
            let mut st = self.state();
            st.is_loading = true;
            st.epoch
        };
        let _busy = BusyGuard::new(self, epoch, BusyFlag::Loading);

        tokio::time::sleep(self.inner.config.login_delay).await;

        let user = {
            let mut st = self.state();
            if st.epoch != epoch {
                warn!(email = %email, "Login superseded by logout");
                return Err(ClientError::LoginCancelled);
            }
            let user = default_profile(&email);
            st.current_user = Some(user.clone());
            self.persist_user(&st);
            user
        };

        info!(user = %user.id, email = %user.email, "Logged in");
        self.emit(SessionEvent::LoggedIn {
            user_id: user.id.clone(),
        });
        Ok(user)
    }

    /// Tear the session down: pending scripted messages are cancelled, all
    /// user data leaves memory and the app's storage keys are removed. The
    /// in-memory theme is kept.
    pub fn logout(&self) {
        let cancelled = lock(&self.inner.tasks).cancel_all();

        {
            let mut st = self.state();
            st.reset_session();
            if self.inner.config.wipe_all_on_logout {
                self.inner.persister.clear();
            } else {
                self.inner.persister.remove_many(&APP_KEYS);
            }
        }

        info!(cancelled, "Logged out");
        self.emit(SessionEvent::LoggedOut);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().current_user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use iesgo_shared::constants::{KEY_THEME, KEY_USER};
    use iesgo_shared::types::{MessageKind, SwipeKind, UserId};
    use iesgo_shared::ValidationError;
    use iesgo_store::KvStore;

    use super::*;
    use crate::commands::test_support::{self, EMAIL};
    use crate::config::ClientConfig;

    #[tokio::test(start_paused = true)]
    async fn test_login_installs_default_profile() {
        let (session, store) = test_support::session(false);
        let mut events = session.subscribe();

        let user = session.login("  eu@iesgo.edu.br ").await.unwrap();
        assert_eq!(user.email, EMAIL);
        assert_eq!(session.current_user(), Some(user.clone()));
        assert!(!session.is_loading());

        session.flush().await;
        let stored = store.get(KEY_USER).unwrap().unwrap();
        assert!(stored.contains(r#""email":"eu@iesgo.edu.br""#));
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::LoggedIn { user_id: user.id }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_email_changes_nothing() {
        let (session, store) = test_support::session(false);

        let err = session.login("not-an-email").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::InvalidEmail(_))
        ));
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());

        session.flush().await;
        assert!(store.keys().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_write_while_login_pending() {
        let (session, store) = test_support::session(false);

        let s = session.clone();
        let pending = tokio::spawn(async move { s.login(EMAIL).await });

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(session.is_loading());
        session.flush().await;
        assert!(store.get(KEY_USER).unwrap().is_none());

        pending.await.unwrap().unwrap();
        assert!(!session.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_login_wins() {
        let (session, _store) = test_support::session(false);

        let s = session.clone();
        let pending = tokio::spawn(async move { s.login(EMAIL).await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        session.logout();

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(ClientError::LoginCancelled)));
        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_cancels_tasks_and_clears_app_keys() {
        let (session, store) = test_support::signed_in(true).await;
        store.set("unrelated", "kept").unwrap();

        assert!(session.swipe(&UserId::from("user_2"), SwipeKind::Study));
        let match_id = session.matches()[0].id.clone();
        session.send_message(&match_id, "oi", MessageKind::Text);
        assert!(session.pending_tasks() > 0);

        session.logout();
        assert_eq!(session.pending_tasks(), 0);
        assert!(session.current_user().is_none());
        assert!(session.matches().is_empty());
        assert!(session.swipes().is_empty());
        assert!(session.active_filters().is_empty());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(session.messages(&match_id).is_empty());

        session.flush().await;
        assert_eq!(store.keys().unwrap(), vec!["unrelated".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wipe_all_on_logout() {
        let store = std::sync::Arc::new(iesgo_store::MemoryStore::new());
        store.set("unrelated", "gone").unwrap();
        let config = ClientConfig {
            wipe_all_on_logout: true,
            ..Default::default()
        };
        let session = Session::restore(store.clone(), config);
        session.login(EMAIL).await.unwrap();
        session.toggle_theme();

        session.logout();
        session.flush().await;
        assert!(store.keys().unwrap().is_empty());
        assert!(store.get(KEY_THEME).unwrap().is_none());
    }
}
