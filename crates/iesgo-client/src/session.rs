//! The session handle.
//!
//! [`Session`] is an explicitly owned context object: it is built once from a
//! storage backend (restoring whatever was persisted) and then passed to
//! whoever drives the UI. Cloning is cheap and every clone shares the same
//! state. Operations live in [`crate::commands`].

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use iesgo_shared::constants::{KEY_MATCHES, KEY_MESSAGES, KEY_SWIPES, KEY_THEME, KEY_USER};
use iesgo_shared::Catalog;
use iesgo_store::{encode, KvStore, PersistedState};

use crate::ai::{collaborator_from_config, AiCollaborator};
use crate::config::ClientConfig;
use crate::decider::{MatchDecider, RandomDecider};
use crate::events::{SessionEvent, EVENT_BUFFER};
use crate::persist::Persister;
use crate::state::AppState;
use crate::tasks::TaskScheduler;

#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) state: Mutex<AppState>,
    pub(crate) catalog: Catalog,
    pub(crate) persister: Persister,
    pub(crate) tasks: Mutex<TaskScheduler>,
    pub(crate) decider: Box<dyn MatchDecider>,
    pub(crate) ai: Arc<dyn AiCollaborator>,
    pub(crate) events: broadcast::Sender<SessionEvent>,
    pub(crate) config: ClientConfig,
    /// Only feeds the cosmetic compatibility score.
    pub(crate) rng: Mutex<StdRng>,
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SessionBuilder {
    store: Arc<dyn KvStore>,
    config: ClientConfig,
    catalog: Catalog,
    decider: Option<Box<dyn MatchDecider>>,
    ai: Option<Arc<dyn AiCollaborator>>,
    seed: Option<u64>,
}

impl SessionBuilder {
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn decider(mut self, decider: impl MatchDecider + 'static) -> Self {
        self.decider = Some(Box::new(decider));
        self
    }

    pub fn ai(mut self, ai: Arc<dyn AiCollaborator>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Seed every random source the session owns.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load persisted state and start the persistence writer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn restore(self) -> Session {
        let saved = PersistedState::load(self.store.as_ref());
        let state = AppState::from_persisted(saved);

        if let Some(ref user) = state.current_user {
            info!(
                user = %user.id,
                matches = state.matches.len(),
                swipes = state.swipes.len(),
                "Restored session"
            );
        } else {
            info!("No persisted session, starting signed out");
        }

        let config = self.config;
        let decider: Box<dyn MatchDecider> = match (self.decider, self.seed) {
            (Some(decider), _) => decider,
            (None, Some(seed)) => Box::new(RandomDecider::seeded(config.match_probability, seed)),
            (None, None) => Box::new(RandomDecider::from_entropy(config.match_probability)),
        };
        let ai = self.ai.unwrap_or_else(|| collaborator_from_config(&config));
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        Session {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                catalog: self.catalog,
                persister: Persister::spawn(self.store),
                tasks: Mutex::new(TaskScheduler::new()),
                decider,
                ai,
                events,
                config,
                rng: Mutex::new(rng),
            }),
        }
    }
}

impl Session {
    pub fn builder(store: Arc<dyn KvStore>, config: ClientConfig) -> SessionBuilder {
        SessionBuilder {
            store,
            config,
            catalog: Catalog::seed(),
            decider: None,
            ai: None,
            seed: None,
        }
    }

    /// Restore with default collaborators. See [`SessionBuilder::restore`].
    pub fn restore(store: Arc<dyn KvStore>, config: ClientConfig) -> Self {
        Self::builder(store, config).restore()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Wait until every write queued so far has reached storage.
    pub async fn flush(&self) {
        self.inner.persister.flush().await;
    }

    /// Snapshot of what would be persisted right now.
    pub fn snapshot(&self) -> PersistedState {
        self.state().to_persisted()
    }

    /// Scheduled tasks that have not run yet.
    pub fn pending_tasks(&self) -> usize {
        lock(&self.inner.tasks).pending()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, AppState> {
        lock(&self.inner.state)
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.state().epoch
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        debug!(event = event.name(), "session event");
        // no subscribers is fine
        let _ = self.inner.events.send(event);
    }

    /// Run `job` after `delay` unless the session is logged out first.
    /// The task does not keep the session alive.
    pub(crate) fn schedule<F, Fut>(&self, delay: Duration, job: F)
    where
        F: FnOnce(Session) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let weak = Arc::downgrade(&self.inner);
        lock(&self.inner.tasks).schedule(delay, async move {
            if let Some(inner) = weak.upgrade() {
                job(Session { inner }).await;
            }
        });
    }

    // ------------------------------------------------------------------
    // Per-key persistence
    // ------------------------------------------------------------------

    pub(crate) fn persist_user(&self, st: &AppState) {
        match st.current_user {
            Some(ref user) => self.persist_json(KEY_USER, user),
            None => self.inner.persister.remove(KEY_USER),
        }
    }

    pub(crate) fn persist_matches(&self, st: &AppState) {
        self.persist_json(KEY_MATCHES, &st.matches);
    }

    pub(crate) fn persist_messages(&self, st: &AppState) {
        self.persist_json(KEY_MESSAGES, &st.messages);
    }

    pub(crate) fn persist_swipes(&self, st: &AppState) {
        self.persist_json(KEY_SWIPES, &st.swipes);
    }

    pub(crate) fn persist_theme(&self, st: &AppState) {
        self.inner.persister.put(KEY_THEME, st.theme.as_str().to_string());
    }

    fn persist_json<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) {
        match encode(value) {
            Ok(json) => self.inner.persister.put(key, json),
            Err(e) => error!(key, error = %e, "failed to encode state for storage"),
        }
    }
}
